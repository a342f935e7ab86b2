use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::Instrument;

/// Middleware that logs HTTP requests at INFO level.
///
/// Each request runs inside a span carrying a fresh request id, so provider
/// and storage logs can be tied back to the request that caused them.
pub async fn request_logger(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = uuid::Uuid::new_v4().simple().to_string();

    let span = tracing::info_span!("request", id = %request_id);
    let response = next.run(request).instrument(span).await;

    let status = response.status();
    let duration = start.elapsed();

    tracing::info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        status = %status.as_u16(),
        duration_ms = %duration.as_millis(),
        "HTTP request"
    );

    response
}
