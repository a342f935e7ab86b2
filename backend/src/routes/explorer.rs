//! Explorer entry point: one URL, three views picked by the access gate.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Query, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use kg_explorer_common::{AccessMode, EntityResult, SearchLogEntry, Variant};

use crate::error::Result;
use crate::gate::RequestContext;
use crate::{client_ip, AppState};

/// Entries shown when the explorer is opened in admin mode.
const ADMIN_PREVIEW_LIMIT: u32 = 50;

/// Query parameters accepted by the explorer.
#[derive(Debug, Default, Deserialize)]
pub struct ExplorerQuery {
    pub admin: Option<String>,
    pub related: Option<String>,
    pub keyword: Option<String>,
    /// Comma-separated language codes for entity search.
    pub languages: Option<String>,
    pub location_code: Option<u32>,
    pub language_code: Option<String>,
}

impl ExplorerQuery {
    fn context(&self) -> RequestContext {
        RequestContext::new(self.admin.as_deref(), self.related.as_deref())
    }

    /// The keyword as typed; `None` when missing or blank.
    fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref().filter(|k| !k.trim().is_empty())
    }

    /// Selected language codes in the order given, blanks and repeats dropped.
    fn language_codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = Vec::new();
        for code in self.languages.as_deref().unwrap_or("").split(',') {
            let code = code.trim();
            if !code.is_empty() && !codes.contains(&code) {
                codes.push(code);
            }
        }
        codes
    }
}

/// Response of the explorer, tagged by the mode that produced it.
#[derive(Debug, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ExplorerResponse {
    Admin {
        entries: Vec<SearchLogEntry>,
        warnings: Vec<String>,
    },
    RelatedTerms {
        keyword: Option<String>,
        location_code: u32,
        language_code: String,
        terms: Vec<String>,
        warnings: Vec<String>,
    },
    Normal {
        keyword: Option<String>,
        languages: Vec<Variant>,
        results: Vec<EntityResult>,
        warnings: Vec<String>,
    },
}

/// GET / - Resolve the access mode and run the matching view
async fn explore(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ExplorerQuery>,
    headers: HeaderMap,
    connect_info: Option<ConnectInfo<SocketAddr>>,
) -> Result<Json<ExplorerResponse>> {
    let ctx = query
        .context()
        .with_client_ip(client_ip::lookup(&headers, connect_info.map(|c| c.0)));

    let mode = state.gate.resolve(&ctx);
    tracing::debug!("Explorer request resolved to {} mode", mode);

    let response = match mode {
        AccessMode::Admin => {
            let log = state.search.admin_log(Some(ADMIN_PREVIEW_LIMIT));
            ExplorerResponse::Admin {
                entries: log.value,
                warnings: log.warnings,
            }
        }
        AccessMode::RelatedTerms => {
            let related = &state.config.related_terms;
            let location_code = query.location_code.unwrap_or(related.location_code);
            let language_code = query
                .language_code
                .clone()
                .unwrap_or_else(|| related.language_code.clone());

            let outcome = match query.keyword() {
                Some(keyword) => {
                    state
                        .search
                        .run_related_search(keyword, location_code, &language_code)
                        .await?
                }
                None => Default::default(),
            };

            ExplorerResponse::RelatedTerms {
                keyword: query.keyword().map(String::from),
                location_code,
                language_code,
                terms: outcome.value,
                warnings: outcome.warnings,
            }
        }
        AccessMode::Normal => {
            let variants: Vec<Variant> = query
                .language_codes()
                .into_iter()
                .map(|code| state.config.entity_search.variant_for(code))
                .collect();

            let outcome = match query.keyword() {
                Some(keyword) => {
                    state
                        .search
                        .run_entity_search(keyword, &variants, ctx.client_ip.as_deref())
                        .await?
                }
                None => Default::default(),
            };

            ExplorerResponse::Normal {
                keyword: query.keyword().map(String::from),
                languages: variants,
                results: outcome.value,
                warnings: outcome.warnings,
            }
        }
    };

    Ok(Json(response))
}

/// GET /languages - Languages offered for entity search
async fn list_languages(State(state): State<Arc<AppState>>) -> Json<Vec<Variant>> {
    Json(state.config.entity_search.languages.clone())
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(explore))
        .route("/languages", get(list_languages))
        .with_state(state)
}
