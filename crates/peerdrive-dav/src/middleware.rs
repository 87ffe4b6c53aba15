//! HTTP middleware for shared DAV headers and request logging

use crate::AppState;
use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Duration;

/// Window after boot during which every response forces the connection
/// closed. A reconnecting client may still hold keep-alive sockets aimed at
/// a previous process instance.
const BOOT_LINGER_WINDOW: Duration = Duration::from_secs(5);

/// Attach the DAV capability and CORS headers to every response.
///
/// The origin/credentials pair is set by hand here; `tower_http`'s CORS
/// layer rejects a wildcard origin combined with credentials.
pub async fn dav_headers(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert("DAV", HeaderValue::from_static("1,2"));
    headers.insert("MS-Author-Via", HeaderValue::from_static("DAV"));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.insert(
        header::ACCESS_CONTROL_EXPOSE_HEADERS,
        HeaderValue::from_static("DAV, content-length, Allow"),
    );
    if state.started_at.elapsed() < BOOT_LINGER_WINDOW {
        headers.insert(header::CONNECTION, HeaderValue::from_static("close"));
    }
    response
}

/// Logging middleware
pub async fn log_requests(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    tracing::info!(
        method = %method,
        uri = %uri,
        status = %status.as_u16(),
        duration_ms = %duration.as_millis(),
        "request completed"
    );

    response
}
