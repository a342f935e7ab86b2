//! Google Knowledge Graph Search API client.

use reqwest::Client;
use serde::Deserialize;

use kg_explorer_common::{EntityResult, Variant};

use super::{build_http_client, ProviderError};
use crate::config::EntitySearchConfig;

const PROVIDER: &str = "Knowledge Graph";
const MISSING_VALUE: &str = "N/A";

/// Client for the entity search endpoint.
pub struct KnowledgeGraphClient {
    http_client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "itemListElement", default)]
    item_list_element: Vec<ListItem>,
}

#[derive(Debug, Deserialize)]
struct ListItem {
    #[serde(default)]
    result: Entity,
    #[serde(rename = "resultScore", default)]
    result_score: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct Entity {
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "@type", default)]
    types: Vec<String>,
    #[serde(default)]
    description: Option<String>,
}

impl KnowledgeGraphClient {
    pub fn new(config: &EntitySearchConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            http_client: build_http_client(config.timeout_secs)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
        })
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    /// Search entities for `keyword` in one language.
    ///
    /// Issues exactly one request. Results keep the provider's ranking order.
    pub async fn search_entities(
        &self,
        keyword: &str,
        variant: &Variant,
        limit: u32,
    ) -> Result<Vec<EntityResult>, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingCredentials("entity_search.api_key"))?;

        let url = format!("{}/v1/entities:search", self.base_url);
        let limit = limit.to_string();

        tracing::debug!("Searching entities for '{}' in {}", keyword, variant.code);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("query", keyword),
                ("limit", limit.as_str()),
                ("key", api_key),
                ("languages", variant.code.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                provider: PROVIDER,
                message: format!("{}: {}", status, body),
            });
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        Ok(normalize(parsed, variant))
    }
}

fn normalize(response: SearchResponse, variant: &Variant) -> Vec<EntityResult> {
    response
        .item_list_element
        .into_iter()
        .map(|item| EntityResult {
            name: item.result.name.unwrap_or_else(|| MISSING_VALUE.to_string()),
            entity_types: item.result.types,
            description: item
                .result
                .description
                .unwrap_or_else(|| MISSING_VALUE.to_string()),
            score: item.result_score.unwrap_or(0.0),
            language_code: variant.code.clone(),
            language_label: variant.label.clone(),
        })
        .collect()
}
