//! Search history page.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use kg_explorer_common::SearchLogEntry;

use crate::gate::RequestContext;
use crate::AppState;

/// Entries shown to non-admin callers.
const RECENT_LIMIT: u32 = 20;

/// Response for /history.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryResponse {
    /// "all" for admins, "recent" otherwise.
    pub scope: &'static str,
    pub entries: Vec<SearchLogEntry>,
    pub warnings: Vec<String>,
}

/// GET /history - Whole log for admins, most recent searches for everyone else
///
/// Searches carry no user identity, so "recent" is the same list for every caller.
async fn history(
    State(state): State<Arc<AppState>>,
    Query(ctx): Query<RequestContext>,
) -> Json<HistoryResponse> {
    let (scope, log) = if state.gate.is_admin(&ctx) {
        ("all", state.search.admin_log(None))
    } else {
        ("recent", state.search.recent_history(RECENT_LIMIT))
    };

    Json(HistoryResponse {
        scope,
        entries: log.value,
        warnings: log.warnings,
    })
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/history", get(history))
        .with_state(state)
}
