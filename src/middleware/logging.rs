//! Request logging middleware.
//!
//! Logs every HTTP request with method, path, status code and latency, under
//! a per-request span carrying a generated request id.

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, warn, Instrument};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Logs at WARN for 5xx, INFO otherwise. `/health` is passed through silently.
pub async fn request_logging(request: Request<Body>, next: Next) -> Response {
    let path = request.uri().path().to_string();
    if path == "/health" {
        return next.run(request).await;
    }

    let method = request.method().clone();
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!(
        "http_request",
        %request_id,
        method = %method,
        path = %path,
    );

    async move {
        let start = Instant::now();
        let mut response = next.run(request).await;
        let latency_ms = start.elapsed().as_millis() as u64;
        let status = response.status().as_u16();

        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }

        if status >= 500 {
            warn!(status, latency_ms, "Request failed (5xx)");
        } else if status >= 400 {
            info!(status, latency_ms, "Request rejected (4xx)");
        } else {
            info!(status, latency_ms, "Request completed");
        }

        response
    }
    .instrument(span)
    .await
}
