//! Error taxonomy and status mapping

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use peerdrive_store::StoreError;
use thiserror::Error;

/// Methods the gateway answers, advertised in `Allow` headers
pub const ALLOWED_METHODS: &str =
    "OPTIONS,PROPFIND,GET,HEAD,PUT,DELETE,MKCOL,MOVE,LOCK,UNLOCK,PROPPATCH";

/// Gateway error type
#[derive(Error, Debug)]
pub enum DavError {
    /// Absent key or unmapped path
    #[error("resource not found")]
    NotFound,

    /// Mutation attempted without write permission
    #[error("writes are not permitted on this session")]
    Forbidden,

    /// Inline PUT over the cap
    #[error("payload exceeds the inline write cap")]
    PayloadTooLarge,

    /// Every requested range was unsatisfiable
    #[error("requested range not satisfiable")]
    RangeNotSatisfiable { size: u64 },

    /// Method outside the DAV surface
    #[error("method not allowed")]
    MethodNotAllowed,

    /// Malformed request, e.g. a missing or foreign Destination header
    #[error("{0}")]
    BadRequest(String),

    /// Store error that was expected to succeed
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for DavError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND.into_response(),
            Self::Forbidden => StatusCode::FORBIDDEN.into_response(),
            Self::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "payload exceeds the 16 MiB inline write cap; use the drive's \
                 out-of-band ingest path for large files\n",
            )
                .into_response(),
            Self::RangeNotSatisfiable { size } => (
                StatusCode::RANGE_NOT_SATISFIABLE,
                [(header::CONTENT_RANGE, format!("bytes */{size}"))],
            )
                .into_response(),
            Self::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                [(header::ALLOW, ALLOWED_METHODS)],
            )
                .into_response(),
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            Self::Store(e) => {
                tracing::error!(error = %e, "request failed against the content engine");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_error_carries_the_star_content_range() {
        let response = DavError::RangeNotSatisfiable { size: 5 }.into_response();
        assert_eq!(response.status(), StatusCode::RANGE_NOT_SATISFIABLE);
        assert_eq!(
            response.headers().get(header::CONTENT_RANGE).unwrap(),
            "bytes */5"
        );
    }

    #[test]
    fn method_not_allowed_advertises_the_surface() {
        let response = DavError::MethodNotAllowed.into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            response.headers().get(header::ALLOW).unwrap(),
            ALLOWED_METHODS
        );
    }

    #[test]
    fn store_failures_are_internal_errors() {
        let err = DavError::Store(StoreError::WriteFailed {
            key: "k".into(),
            reason: "down".into(),
        });
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
