//! WebDAV request handlers

pub mod lock;
pub mod read;
pub mod write;

use crate::{path, AppState, DavError, ALLOWED_METHODS};
use axum::{
    body::Body,
    extract::State,
    http::{header, Method, Request, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// Route a request to its method handler.
///
/// Paths outside the mount answer only OPTIONS probes; everything else
/// there is unknown territory.
pub async fn dispatch(State(state): State<Arc<AppState>>, request: Request<Body>) -> Response {
    let method = request.method().clone();
    let raw_path = request.uri().path().to_string();

    let Some(key) = path::href_to_key(&raw_path, &state.config.mount) else {
        if method == Method::OPTIONS {
            return options_response();
        }
        return StatusCode::NOT_FOUND.into_response();
    };

    match route(&state, &method, &key, request).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

async fn route(
    state: &AppState,
    method: &Method,
    key: &str,
    request: Request<Body>,
) -> Result<Response, DavError> {
    match method.as_str() {
        "OPTIONS" => Ok(options_response()),
        "PROPFIND" => read::propfind(state, key, request.headers()).await,
        "GET" => read::get(state, key, request.headers(), false).await,
        "HEAD" => read::get(state, key, request.headers(), true).await,
        "PUT" => {
            ensure_writable(state)?;
            write::put(state, key, request).await
        }
        "DELETE" => {
            ensure_writable(state)?;
            write::delete(state, key).await
        }
        "MKCOL" => {
            ensure_writable(state)?;
            Ok(write::mkcol())
        }
        "MOVE" => {
            ensure_writable(state)?;
            write::rename(state, key, request.headers()).await
        }
        "LOCK" => {
            ensure_writable(state)?;
            Ok(lock::lock(&state.config.mount, key))
        }
        "UNLOCK" => {
            ensure_writable(state)?;
            Ok(lock::unlock())
        }
        "PROPPATCH" => {
            ensure_writable(state)?;
            Ok(lock::proppatch())
        }
        _ => Err(DavError::MethodNotAllowed),
    }
}

/// Gate shared by every mutating method
fn ensure_writable(state: &AppState) -> Result<(), DavError> {
    if state.allow_writes() {
        Ok(())
    } else {
        Err(DavError::Forbidden)
    }
}

fn options_response() -> Response {
    (StatusCode::OK, [(header::ALLOW, ALLOWED_METHODS)]).into_response()
}
