//! PUT, DELETE, MKCOL, and MOVE handlers

use crate::{path, AppState, DavError, INLINE_PUT_CAP};
use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use bytes::{Bytes, BytesMut};
use futures::StreamExt;

/// PUT: buffer the body under the inline cap, then write through the
/// strategy chain
pub async fn put(state: &AppState, key: &str, request: Request<Body>) -> Result<Response, DavError> {
    // a declared size over the cap is refused before any body or engine work
    if let Some(declared) = declared_length(request.headers()) {
        if declared > INLINE_PUT_CAP {
            return Err(DavError::PayloadTooLarge);
        }
    }
    // polling the body is what acknowledges an Expect: 100-continue
    let data = read_capped(request.into_body()).await?;
    let len = data.len() as u64;
    state.drive.write(key, data).await?;
    state.size_cache.insert(key, len);
    Ok(StatusCode::CREATED.into_response())
}

/// DELETE: both key variants, absence tolerated, unconditionally 204
pub async fn delete(state: &AppState, key: &str) -> Result<Response, DavError> {
    state.drive.delete(key).await?;
    state.size_cache.invalidate(key);
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// MKCOL: collections are implicit from key prefixes, nothing to materialize
pub fn mkcol() -> Response {
    StatusCode::CREATED.into_response()
}

/// MOVE: copy-then-delete through the same write chain as PUT.
///
/// The drive has no rename primitive, so this is O(size) and not atomic;
/// the inline cap deliberately does not apply here.
pub async fn rename(
    state: &AppState,
    key: &str,
    headers: &HeaderMap,
) -> Result<Response, DavError> {
    let destination = headers
        .get("Destination")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| DavError::BadRequest("missing Destination header".to_string()))?;
    let dest_key = destination_key(destination, &state.config.mount)
        .ok_or_else(|| DavError::BadRequest("Destination is outside the DAV mount".to_string()))?;

    let data = state.drive.get(key).await?.ok_or(DavError::NotFound)?;
    let len = data.len() as u64;
    state.drive.write(&dest_key, data).await?;
    state.drive.delete(key).await?;
    state.size_cache.invalidate(key);
    state.size_cache.insert(&dest_key, len);
    Ok(StatusCode::CREATED.into_response())
}

/// Resolve a Destination header, given either as an absolute URL or a bare
/// path, to a canonical key
fn destination_key(value: &str, mount: &str) -> Option<String> {
    let path = match value.parse::<Uri>() {
        Ok(uri) => uri.path().to_string(),
        Err(_) => value.to_string(),
    };
    path::href_to_key(&path, mount)
}

fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

/// Buffer a request body, aborting as soon as it exceeds the inline cap
async fn read_capped(body: Body) -> Result<Bytes, DavError> {
    let mut stream = body.into_data_stream();
    let mut buffer = BytesMut::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| DavError::BadRequest(e.to_string()))?;
        if buffer.len() as u64 + chunk.len() as u64 > INLINE_PUT_CAP {
            return Err(DavError::PayloadTooLarge);
        }
        buffer.extend_from_slice(&chunk);
    }
    Ok(buffer.freeze())
}
