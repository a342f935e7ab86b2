//! HTTP-facing error type.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::search::MissingConfiguration;

/// Errors that end a request.
///
/// Provider and storage failures are not here: they degrade the response
/// with warnings instead.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Access denied")]
    Forbidden,
}

impl From<MissingConfiguration> for ApiError {
    fn from(e: MissingConfiguration) -> Self {
        ApiError::Configuration(e.0.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ApiError::Configuration(_) => (StatusCode::SERVICE_UNAVAILABLE, "configuration_error"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "access_denied"),
        };

        if let ApiError::Configuration(ref what) = self {
            tracing::error!("Request blocked by missing configuration: {}", what);
        }

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": self.to_string()
            }
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
