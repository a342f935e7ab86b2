use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    let version = env!("CARGO_PKG_VERSION");
    let mut body = format!(
        "# HELP kgx_up Whether the service is up\n\
         # TYPE kgx_up gauge\n\
         kgx_up 1\n\
         # HELP kgx_info Service information\n\
         # TYPE kgx_info gauge\n\
         kgx_info{{version=\"{}\"}} 1\n",
        version
    );
    if let Some(total) = state.search.total_logged() {
        body.push_str(&format!(
            "# HELP kgx_searches_logged Searches recorded in the search log\n\
             # TYPE kgx_searches_logged gauge\n\
             kgx_searches_logged {}\n",
            total
        ));
    }
    (StatusCode::OK, [(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response()
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .with_state(state)
}
