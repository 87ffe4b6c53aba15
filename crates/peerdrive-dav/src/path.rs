//! URL path to drive key translation
//!
//! The mount root maps to the empty key; canonical keys never carry a
//! leading slash. Translation is pure and total: foreign paths are `None`,
//! malformed percent escapes decode lossily instead of failing.

use peerdrive_store::normalize_key;

/// Translate a URL path under the mount prefix into a canonical key.
///
/// Returns `None` for paths outside the mount.
pub fn href_to_key(path: &str, mount: &str) -> Option<String> {
    let mount = mount.trim_end_matches('/');
    let rest = path.strip_prefix(mount)?;
    if !rest.is_empty() && !rest.starts_with('/') {
        // "/davish" is not under "/dav"
        return None;
    }
    let decoded = String::from_utf8_lossy(&urlencoding::decode_binary(rest.as_bytes())).into_owned();
    Some(normalize_key(&decoded))
}

/// Build an href for a key under a base href, percent-encoding each segment.
///
/// Collection hrefs end in a slash.
pub fn key_to_href(base: &str, key: &str, is_collection: bool) -> String {
    let mut href = base.trim_end_matches('/').to_string();
    for segment in key.split('/').filter(|s| !s.is_empty()) {
        href.push('/');
        href.push_str(&urlencoding::encode(segment));
    }
    if is_collection || href.is_empty() {
        href.push('/');
    }
    href
}

/// Whether a key names a desktop sidecar file (`._*`), which some clients
/// scatter next to real entries and expect to read back as absent
pub fn is_sidecar_key(key: &str) -> bool {
    key.rsplit('/')
        .next()
        .is_some_and(|name| name.starts_with("._"))
}

/// Last path segment, used as a display name
pub fn display_name(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foreign_paths_do_not_translate() {
        assert_eq!(href_to_key("/", "/dav"), None);
        assert_eq!(href_to_key("/other/x", "/dav"), None);
        assert_eq!(href_to_key("/davish/x", "/dav"), None);
    }

    #[test]
    fn mount_root_is_the_empty_key() {
        assert_eq!(href_to_key("/dav", "/dav"), Some(String::new()));
        assert_eq!(href_to_key("/dav/", "/dav"), Some(String::new()));
    }

    #[test]
    fn keys_are_normalized() {
        assert_eq!(
            href_to_key("/dav//docs///a.txt", "/dav"),
            Some("docs/a.txt".to_string())
        );
        assert_eq!(
            href_to_key("/dav/notes.txt/", "/dav"),
            Some("notes.txt".to_string())
        );
    }

    #[test]
    fn percent_escapes_decode() {
        assert_eq!(
            href_to_key("/dav/My%20File.txt", "/dav"),
            Some("My File.txt".to_string())
        );
        // malformed escapes fall through lossily rather than erroring
        assert!(href_to_key("/dav/bad%zz", "/dav").is_some());
    }

    #[test]
    fn hrefs_are_segment_encoded() {
        assert_eq!(
            key_to_href("/dav", "docs/My File.txt", false),
            "/dav/docs/My%20File.txt"
        );
        assert_eq!(key_to_href("/dav", "docs", true), "/dav/docs/");
        assert_eq!(key_to_href("/dav", "", true), "/dav/");
    }

    #[test]
    fn sidecar_names_are_detected() {
        assert!(is_sidecar_key("._notes.txt"));
        assert!(is_sidecar_key("docs/._DS_helper"));
        assert!(!is_sidecar_key("docs/notes.txt"));
        assert!(!is_sidecar_key("dotted._middle/file"));
    }

    #[test]
    fn display_name_is_the_last_segment() {
        assert_eq!(display_name("docs/a.txt"), "a.txt");
        assert_eq!(display_name("a.txt"), "a.txt");
    }
}
