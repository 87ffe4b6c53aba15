//! PROPFIND, GET, and HEAD handlers with range streaming

use crate::{cache, mime, path, propfind, range, AppState, DavError};
use axum::{
    body::Body,
    http::{header, HeaderMap, StatusCode},
    response::Response,
};
use bytes::Bytes;
use futures::{
    future::ready,
    stream::{self, StreamExt, TryStreamExt},
};
use peerdrive_store::{ByteRange, ContentEngine, Drive, StoreError};
use uuid::Uuid;

/// PROPFIND: render the target (and its children at depth 1) as multistatus
pub async fn propfind(
    state: &AppState,
    key: &str,
    headers: &HeaderMap,
) -> Result<Response, DavError> {
    let depth = propfind::parse_depth(headers.get("Depth").and_then(|v| v.to_str().ok()));
    let xml = propfind::render_multistatus(&state.drive, &state.config.mount, key, depth).await?;
    Ok(Response::builder()
        .status(StatusCode::MULTI_STATUS)
        .header(header::CONTENT_TYPE, "application/xml; charset=\"utf-8\"")
        .body(Body::from(xml))
        .unwrap())
}

/// GET and HEAD: identical resolution and headers, HEAD emits no body
pub async fn get(
    state: &AppState,
    key: &str,
    headers: &HeaderMap,
    head_only: bool,
) -> Result<Response, DavError> {
    // desktop sidecar probes are noise, not resources
    if path::is_sidecar_key(key) {
        return Err(DavError::NotFound);
    }
    let resolved = state.drive.resolve(key).await?.ok_or(DavError::NotFound)?;
    if resolved.stat.as_ref().is_some_and(|s| s.is_collection) {
        // collections have no byte body; clients browse them via PROPFIND
        return Err(DavError::NotFound);
    }

    let content_type = mime::content_type_for(key);
    let size = cache::resolve_size(&state.size_cache, &state.drive, key, &resolved).await;

    let ranges = match size {
        Some(size) => headers
            .get(header::RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(|h| range::parse_range(h, size)),
        // unknown size: range handling is off the table
        None => None,
    };

    match (size, ranges) {
        (Some(size), Some(ranges)) if ranges.is_empty() => {
            Err(DavError::RangeNotSatisfiable { size })
        }
        (Some(size), Some(ranges)) if ranges.len() == 1 => {
            single_range(state, &resolved.raw, content_type, size, ranges[0], head_only).await
        }
        (Some(size), Some(ranges)) => {
            multi_range(state, &resolved.raw, content_type, size, ranges, head_only).await
        }
        (size, _) => full_body(state, &resolved.raw, content_type, size, head_only).await,
    }
}

async fn full_body(
    state: &AppState,
    raw: &str,
    content_type: &'static str,
    size: Option<u64>,
    head_only: bool,
) -> Result<Response, DavError> {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::ACCEPT_RANGES, "bytes");
    if let Some(size) = size {
        builder = builder.header(header::CONTENT_LENGTH, size);
    }
    if head_only {
        return Ok(builder.body(Body::empty()).unwrap());
    }
    let stream = state
        .drive
        .open_read_stream(raw, None)
        .await
        .map_err(|_| DavError::NotFound)?;
    Ok(builder.body(Body::from_stream(stream)).unwrap())
}

async fn single_range(
    state: &AppState,
    raw: &str,
    content_type: &'static str,
    size: u64,
    span: ByteRange,
    head_only: bool,
) -> Result<Response, DavError> {
    let builder = Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::ACCEPT_RANGES, "bytes")
        .header(
            header::CONTENT_RANGE,
            format!("bytes {}-{}/{}", span.start, span.end, size),
        )
        .header(header::CONTENT_LENGTH, span.byte_len());
    if head_only {
        return Ok(builder.body(Body::empty()).unwrap());
    }
    let stream = state
        .drive
        .open_read_stream(raw, Some(span))
        .await
        .map_err(|_| DavError::NotFound)?;
    Ok(builder.body(Body::from_stream(stream)).unwrap())
}

async fn multi_range(
    state: &AppState,
    raw: &str,
    content_type: &'static str,
    size: u64,
    spans: Vec<ByteRange>,
    head_only: bool,
) -> Result<Response, DavError> {
    let boundary = format!("peerdrive-{}", Uuid::new_v4().simple());
    let builder = Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/byteranges; boundary={boundary}"),
        )
        .header(header::ACCEPT_RANGES, "bytes");
    if head_only {
        return Ok(builder.body(Body::empty()).unwrap());
    }
    let body = multipart_body(
        state.drive.clone(),
        raw.to_string(),
        content_type,
        size,
        spans,
        boundary,
    );
    Ok(builder.body(body).unwrap())
}

/// Assemble a `multipart/byteranges` body.
///
/// Parts are pulled sequentially: each part's engine stream is opened only
/// after the previous one is exhausted, and the body as a whole is pull-based
/// so writes respect transport backpressure.
fn multipart_body<E: ContentEngine + 'static>(
    drive: Drive<E>,
    raw: String,
    content_type: &'static str,
    size: u64,
    spans: Vec<ByteRange>,
    boundary: String,
) -> Body {
    let tail = Bytes::from(format!("\r\n--{boundary}--\r\n"));
    let parts = stream::iter(spans)
        .then(move |span| {
            let drive = drive.clone();
            let raw = raw.clone();
            let head = Bytes::from(format!(
                "\r\n--{boundary}\r\nContent-Type: {content_type}\r\nContent-Range: bytes {}-{}/{}\r\n\r\n",
                span.start, span.end, size
            ));
            async move {
                let part = drive.open_read_stream(&raw, Some(span)).await?;
                Ok::<_, StoreError>(stream::once(ready(Ok(head))).chain(part))
            }
        })
        .try_flatten()
        .chain(stream::once(ready(Ok(tail))));
    Body::from_stream(parts)
}
