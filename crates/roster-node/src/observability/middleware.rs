//! Observability middleware for request tracking and metrics.
//!
//! Provides:
//! - Request ID generation and propagation
//! - HTTP metrics collection
//! - Request/response logging

use axum::{
    extract::{MatchedPath, Request, State},
    http::{header::HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use super::metrics::{normalize_path, MetricsState};

/// Header name for request ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request ID extension type.
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

/// Request ID middleware - adds request ID to all requests.
///
/// Reuses an incoming `x-request-id` header when present, otherwise generates
/// a UUIDv4. The id is stored in request extensions, attached to a `request`
/// span, and echoed back on the response.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        uri = %request.uri(),
    );

    let mut response = next.run(request).instrument(span).await;

    if let Ok(header_value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), header_value);
    }

    response
}

/// Metrics middleware - records HTTP request metrics.
pub async fn metrics_middleware(
    State(metrics): State<MetricsState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| normalize_path(request.uri().path()));

    let active = metrics.start_request();
    let response = next.run(request).await;
    drop(active);

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16();

    metrics.record_http_request(&method, &path, status, duration);

    tracing::debug!(
        method = %method,
        path = %path,
        status = %status,
        duration_ms = %format!("{:.2}", duration * 1000.0),
        "Request completed"
    );

    response
}
