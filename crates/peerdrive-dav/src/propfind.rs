//! PROPFIND multistatus rendering
//!
//! One `<d:response>` for the target, plus one per immediate child at depth
//! 1 on collections. Children that fail to resolve mid-enumeration are
//! skipped rather than reported per-entry; every emitted status is 200.

use crate::path::{display_name, key_to_href};
use crate::DavError;
use chrono::{DateTime, Utc};
use peerdrive_store::{ContentEngine, Drive, EntryStat};

/// RFC 1123 date format used by `getlastmodified`
const HTTP_DATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Interpret a `Depth` header: only the literal `"0"` stays at the target
pub fn parse_depth(value: Option<&str>) -> u8 {
    match value {
        Some("0") => 0,
        _ => 1,
    }
}

/// Escape text for XML content
pub fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

struct ResponseEntry {
    href: String,
    is_collection: bool,
    content_length: u64,
    last_modified: DateTime<Utc>,
    display: String,
}

impl ResponseEntry {
    fn from_stat(mount: &str, key: &str, root_name: &str, stat: Option<&EntryStat>) -> Self {
        let is_collection = key.is_empty() || stat.is_some_and(|s| s.is_collection);
        let content_length = if is_collection {
            0
        } else {
            stat.and_then(|s| s.size).unwrap_or(0)
        };
        let last_modified = stat.and_then(|s| s.modified).unwrap_or_else(Utc::now);
        let display = if key.is_empty() {
            root_name.to_string()
        } else {
            display_name(key).to_string()
        };
        Self {
            href: key_to_href(mount, key, is_collection),
            is_collection,
            content_length,
            last_modified,
            display,
        }
    }

    fn render(&self) -> String {
        let resourcetype = if self.is_collection {
            "<d:collection/>"
        } else {
            ""
        };
        format!(
            r#"  <d:response>
    <d:href>{href}</d:href>
    <d:propstat>
      <d:prop>
        <d:resourcetype>{resourcetype}</d:resourcetype>
        <d:getcontentlength>{length}</d:getcontentlength>
        <d:getlastmodified>{lastmod}</d:getlastmodified>
        <d:displayname>{display}</d:displayname>
      </d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>
"#,
            href = xml_escape(&self.href),
            resourcetype = resourcetype,
            length = self.content_length,
            lastmod = self.last_modified.format(HTTP_DATE),
            display = xml_escape(&self.display),
        )
    }
}

/// Render the multistatus document for a key at the given depth.
pub async fn render_multistatus<E: ContentEngine>(
    drive: &Drive<E>,
    mount: &str,
    key: &str,
    depth: u8,
) -> Result<String, DavError> {
    let root_name = mount.trim_matches('/');
    let mut entries = Vec::new();

    let self_stat = drive.resolve(key).await?.and_then(|r| r.stat);
    let self_entry = ResponseEntry::from_stat(mount, key, root_name, self_stat.as_ref());
    let self_is_collection = self_entry.is_collection;
    entries.push(self_entry);

    if depth > 0 && self_is_collection {
        for child in drive.list(key).await? {
            // children that vanish mid-enumeration are skipped, not errored
            let Ok(Some(resolved)) = drive.resolve(&child).await else {
                continue;
            };
            entries.push(ResponseEntry::from_stat(
                mount,
                &child,
                root_name,
                resolved.stat.as_ref(),
            ));
        }
    }

    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<d:multistatus xmlns:d=\"DAV:\">\n");

    for entry in &entries {
        xml.push_str(&entry.render());
    }
    xml.push_str("</d:multistatus>\n");
    Ok(xml)
}
