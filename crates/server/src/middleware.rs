//! Ambient request middleware: request-id tagging and structured logging.
//!
//! No API-key check or per-key rate limiter here: neither concept exists
//! in this server's surface (docs/ARCHITECTURE.md §6.1 has no
//! authentication or tenancy model).

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Tag each request with an id (from `x-request-id` if the caller sent
/// one, otherwise a fresh UUID), and echo it back on the response.
pub async fn request_id(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    request.extensions_mut().insert(request_id.clone());

    let mut response = next.run(request).await;
    if let Ok(value) = request_id.parse() {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}

/// Structured start/completion logging for every request.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();
    let request_id = request
        .extensions()
        .get::<String>()
        .cloned()
        .unwrap_or_default();

    tracing::info!(method = %method, uri = %uri, request_id = %request_id, "request started");

    let response = next.run(request).await;

    tracing::info!(
        method = %method,
        uri = %uri,
        status = %response.status(),
        duration_ms = %start.elapsed().as_millis(),
        request_id = %request_id,
        "request completed"
    );

    response
}
