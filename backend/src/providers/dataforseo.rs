//! DataForSEO SERP client for "people also search for" terms.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{build_http_client, ProviderError};
use crate::config::RelatedTermsConfig;

const PROVIDER: &str = "DataForSEO";
const SERP_PATH: &str = "/v3/serp/google/organic/live/advanced";
const STATUS_OK: i64 = 20000;
const PEOPLE_ALSO_SEARCH: &str = "people_also_search";

/// Client for the SERP live endpoint.
pub struct DataForSeoClient {
    http_client: Client,
    base_url: String,
    username: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Serialize)]
struct SerpTask<'a> {
    keyword: &'a str,
    location_code: u32,
    language_code: &'a str,
    device: &'static str,
}

#[derive(Debug, Deserialize)]
struct SerpResponse {
    status_code: i64,
    #[serde(default)]
    status_message: String,
    #[serde(default)]
    tasks: Vec<SerpTaskResult>,
}

#[derive(Debug, Deserialize)]
struct SerpTaskResult {
    #[serde(default)]
    result: Option<Vec<SerpResult>>,
}

#[derive(Debug, Deserialize)]
struct SerpResult {
    #[serde(default)]
    items: Option<Vec<Value>>,
}

impl DataForSeoClient {
    pub fn new(config: &RelatedTermsConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            http_client: build_http_client(config.timeout_secs)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            username: config.username.clone().filter(|u| !u.is_empty()),
            password: config.password.clone().filter(|p| !p.is_empty()),
        })
    }

    pub fn has_credentials(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }

    /// Fetch related search terms for one keyword, location and language.
    ///
    /// Terms come back in discovery order, duplicates included.
    pub async fn related_terms(
        &self,
        keyword: &str,
        location_code: u32,
        language_code: &str,
    ) -> Result<Vec<String>, ProviderError> {
        let (Some(username), Some(password)) = (&self.username, &self.password) else {
            return Err(ProviderError::MissingCredentials(
                "related_terms.username / related_terms.password",
            ));
        };

        let body = [SerpTask {
            keyword,
            location_code,
            language_code,
            device: "desktop",
        }];

        let url = format!("{}{}", self.base_url, SERP_PATH);

        tracing::debug!(
            "Fetching related terms for '{}' (location {}, language {})",
            keyword,
            location_code,
            language_code
        );

        let response = self
            .http_client
            .post(&url)
            .basic_auth(username, Some(password))
            .json(&body)
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

        let parsed: SerpResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        if parsed.status_code != STATUS_OK {
            return Err(ProviderError::Api {
                provider: PROVIDER,
                message: format!("{} - {}", parsed.status_code, parsed.status_message),
            });
        }

        Ok(flatten_related(&parsed))
    }
}

/// Collect related terms from the first task's result items.
fn flatten_related(response: &SerpResponse) -> Vec<String> {
    let mut terms = Vec::new();

    let Some(task) = response.tasks.first() else {
        return terms;
    };

    for result in task.result.iter().flatten() {
        for item in result.items.iter().flatten() {
            collect_from_item(item, &mut terms);
        }
    }

    terms
}

/// Handles both response revisions: a `people_also_search` typed item carrying
/// `items`, or a `people_also_search` field holding either `{items: [...]}` or
/// a bare array.
fn collect_from_item(item: &Value, terms: &mut Vec<String>) {
    if item.get("type").and_then(Value::as_str) == Some(PEOPLE_ALSO_SEARCH) {
        if let Some(entries) = item.get("items").and_then(Value::as_array) {
            terms.extend(entries.iter().filter_map(term_text));
        }
    }

    match item.get(PEOPLE_ALSO_SEARCH) {
        Some(Value::Array(entries)) => {
            terms.extend(entries.iter().filter_map(term_text));
        }
        Some(group @ Value::Object(_)) => {
            if let Some(entries) = group.get("items").and_then(Value::as_array) {
                terms.extend(entries.iter().filter_map(term_text));
            }
        }
        _ => {}
    }
}

fn term_text(entry: &Value) -> Option<String> {
    match entry {
        Value::String(s) => Some(s.clone()),
        Value::Object(_) => entry.get("title").and_then(Value::as_str).map(String::from),
        _ => None,
    }
}
