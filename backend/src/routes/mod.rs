pub mod admin;
pub mod explorer;
pub mod health;
pub mod history;

use std::sync::Arc;
use axum::Router;

use crate::AppState;

/// All routes of the service.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(health::router(state.clone()))
        .merge(explorer::router(state.clone()))
        .merge(history::router(state.clone()))
        .nest("/admin", admin::router(state))
}
