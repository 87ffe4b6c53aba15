//! Class 2 compatibility stubs
//!
//! Some clients (Finder and Explorer among them) probe for Class 2 locking
//! before they permit writes. These handlers advertise it without enforcing
//! anything: tokens are fabricated, never stored, and never checked again.

use crate::path::key_to_href;
use crate::propfind::xml_escape;
use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

/// LOCK: fabricate an exclusive write lock that nothing honors
pub fn lock(mount: &str, key: &str) -> Response {
    let token = format!("opaquelocktoken:{}", Uuid::new_v4());
    let href = key_to_href(mount, key, false);
    let body = format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<d:prop xmlns:d="DAV:">
  <d:lockdiscovery>
    <d:activelock>
      <d:locktype><d:write/></d:locktype>
      <d:lockscope><d:exclusive/></d:lockscope>
      <d:depth>infinity</d:depth>
      <d:timeout>Second-3600</d:timeout>
      <d:locktoken><d:href>{token}</d:href></d:locktoken>
      <d:lockroot><d:href>{href}</d:href></d:lockroot>
    </d:activelock>
  </d:lockdiscovery>
</d:prop>
"#,
        token = token,
        href = xml_escape(&href),
    );
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/xml; charset=\"utf-8\"")
        .header("Lock-Token", format!("<{token}>"))
        .body(Body::from(body))
        .unwrap()
}

/// UNLOCK: there was never a lock to release
pub fn unlock() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// PROPPATCH: acknowledge without persisting any property
pub fn proppatch() -> Response {
    Response::builder()
        .status(StatusCode::MULTI_STATUS)
        .header(header::CONTENT_TYPE, "application/xml; charset=\"utf-8\"")
        .body(Body::from(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<d:multistatus xmlns:d=\"DAV:\"/>\n",
        ))
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_fabricates_a_fresh_token_each_time() {
        let a = lock("/dav", "notes.txt");
        let b = lock("/dav", "notes.txt");
        let ta = a.headers().get("Lock-Token").unwrap().to_str().unwrap().to_string();
        let tb = b.headers().get("Lock-Token").unwrap().to_str().unwrap().to_string();
        assert!(ta.starts_with("<opaquelocktoken:"));
        assert_ne!(ta, tb);
    }

    #[test]
    fn unlock_always_succeeds() {
        assert_eq!(unlock().status(), StatusCode::NO_CONTENT);
    }

    #[test]
    fn proppatch_acknowledges_with_an_empty_multistatus() {
        let response = proppatch();
        assert_eq!(response.status(), StatusCode::MULTI_STATUS);
    }
}
