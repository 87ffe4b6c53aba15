//! In-memory content engine for testing and development

use crate::{
    chunk_stream, normalize_key, ByteRange, ByteStream, ContentEngine, EntryStat, Result,
};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Clone)]
struct StoredEntry {
    data: Bytes,
    modified: DateTime<Utc>,
}

/// An in-memory content engine.
///
/// Keys are stored exactly as written, so entries seeded with a leading slash
/// behave like a legacy drive that answers under both key variants.
#[derive(Clone, Default)]
pub struct MemoryEngine {
    entries: Arc<DashMap<String, StoredEntry>>,
    read_only: bool,
}

impl MemoryEngine {
    /// Create a new empty engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine whose session cannot write, like a joined peer drive
    pub fn read_only() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            read_only: true,
        }
    }

    /// Number of entries stored
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the engine holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Seed an entry under the exact raw key given, leading slash included.
    ///
    /// Used to emulate a legacy drive that stored slash-prefixed keys.
    pub fn insert_raw(&self, key: impl Into<String>, data: impl Into<Bytes>) {
        self.entries.insert(
            key.into(),
            StoredEntry {
                data: data.into(),
                modified: Utc::now(),
            },
        );
    }
}

#[async_trait]
impl ContentEngine for MemoryEngine {
    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        Ok(self.entries.get(key).map(|e| e.data.clone()))
    }

    async fn put(&self, key: &str, data: Bytes) -> Result<()> {
        self.entries.insert(
            key.to_string(),
            StoredEntry {
                data,
                modified: Utc::now(),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let want = normalize_key(prefix);
        let mut seen = HashSet::new();
        let mut children = Vec::new();
        for entry in self.entries.iter() {
            let raw = entry.key();
            let norm = normalize_key(raw);
            let rel = if want.is_empty() {
                norm.as_str()
            } else {
                match norm.strip_prefix(want.as_str()) {
                    Some(rest) if rest.starts_with('/') => &rest[1..],
                    _ => continue,
                }
            };
            if rel.is_empty() {
                continue;
            }
            let first = rel.split('/').next().unwrap_or(rel);
            // rebuild the child in the raw key's own variant
            let lead = if raw.starts_with('/') { "/" } else { "" };
            let child = if want.is_empty() {
                format!("{lead}{first}")
            } else {
                format!("{lead}{want}/{first}")
            };
            if seen.insert(child.clone()) {
                children.push(child);
            }
        }
        children.sort();
        Ok(children)
    }

    async fn stat(&self, key: &str) -> Result<Option<EntryStat>> {
        if let Some(entry) = self.entries.get(key) {
            return Ok(Some(EntryStat::entry(
                Some(entry.data.len() as u64),
                Some(entry.modified),
            )));
        }
        // virtual collection: any stored key strictly beneath this prefix
        let want = normalize_key(key);
        if !want.is_empty() {
            let is_prefix = self.entries.iter().any(|entry| {
                normalize_key(entry.key())
                    .strip_prefix(want.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
            });
            if is_prefix {
                return Ok(Some(EntryStat::collection()));
            }
        }
        Ok(None)
    }

    async fn read_stream(&self, key: &str, range: Option<ByteRange>) -> Result<ByteStream> {
        let entry = self
            .entries
            .get(key)
            .ok_or_else(|| crate::StoreError::NotFound(key.to_string()))?;
        let data = entry.data.clone();
        let data = match range {
            Some(r) => {
                let len = data.len() as u64;
                let start = r.start.min(len) as usize;
                let end = (r.end + 1).min(len) as usize;
                data.slice(start..end.max(start))
            }
            None => data,
        };
        Ok(chunk_stream(data))
    }

    fn writable(&self) -> bool {
        !self.read_only
    }
}
