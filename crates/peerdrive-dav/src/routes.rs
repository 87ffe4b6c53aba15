//! HTTP route definitions

use crate::{handlers, middleware, AppState};
use axum::{middleware as axum_middleware, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Create the main router.
///
/// WebDAV methods (PROPFIND, MKCOL, MOVE, …) sit outside axum's method
/// filters, so a single fallback dispatcher matches on the method itself.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .fallback(handlers::dispatch)
        .layer(axum_middleware::from_fn_with_state(
            Arc::clone(&state),
            middleware::dav_headers,
        ))
        .layer(axum_middleware::from_fn(middleware::log_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
