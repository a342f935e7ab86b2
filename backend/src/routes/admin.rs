//! Admin panel routes.
//!
//! Provides:
//! - Full search log (`/admin`), optionally capped with `?limit=`
//! - A single log entry (`/admin/searches/:id`)
//!
//! Every route requires `?admin=<secret>`.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use kg_explorer_common::SearchLogEntry;

use crate::error::{ApiError, Result};
use crate::gate::RequestContext;
use crate::AppState;

/// Middleware that requires the admin secret in the query string.
async fn require_admin(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let ctx = Query::<RequestContext>::try_from_uri(request.uri())
        .map(|Query(ctx)| ctx)
        .unwrap_or_default();

    if !state.gate.is_admin(&ctx) {
        tracing::info!("Rejected admin request to {}", request.uri().path());
        return ApiError::Forbidden.into_response();
    }

    next.run(request).await
}

/// Query parameters for the log listing.
#[derive(Debug, Deserialize)]
struct LogQuery {
    limit: Option<u32>,
}

/// Response for the admin log listing.
#[derive(Debug, Clone, Serialize)]
pub struct SearchLogResponse {
    pub entries: Vec<SearchLogEntry>,
    pub returned: usize,
    /// Total stored entries; absent when the store could not be read.
    pub total: Option<u64>,
    pub warnings: Vec<String>,
}

/// GET /admin - Full search log, newest first
async fn search_log(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LogQuery>,
) -> Json<SearchLogResponse> {
    let log = state.search.admin_log(query.limit);
    let total = state.search.total_logged();

    Json(SearchLogResponse {
        returned: log.value.len(),
        entries: log.value,
        total,
        warnings: log.warnings,
    })
}

/// Response for a single log entry.
#[derive(Debug, Clone, Serialize)]
pub struct SearchEntryResponse {
    /// The entry; absent when the store could not be read.
    pub entry: Option<SearchLogEntry>,
    pub warnings: Vec<String>,
}

/// GET /admin/searches/:id - One log entry
async fn search_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SearchEntryResponse>> {
    let lookup = state.search.log_entry(id);

    if lookup.value.is_none() && lookup.warnings.is_empty() {
        return Err(ApiError::NotFound(format!("search {}", id)));
    }

    Ok(Json(SearchEntryResponse {
        entry: lookup.value,
        warnings: lookup.warnings,
    }))
}

/// Build the admin router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(search_log))
        .route("/searches/:id", get(search_entry))
        .layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .with_state(state)
}
