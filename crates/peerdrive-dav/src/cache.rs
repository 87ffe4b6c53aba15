//! Size resolution with a process-lifetime cache
//!
//! The cache holds last-known sizes by canonical key. Entries are removed on
//! delete and refreshed authoritatively on write, so staleness costs at most
//! one extra resolution round-trip, never a wrong body.

use dashmap::DashMap;
use futures::StreamExt;
use peerdrive_store::{ContentEngine, Drive, ResolvedKey};

/// Last-known sizes by canonical key
#[derive(Default)]
pub struct SizeCache {
    sizes: DashMap<String, u64>,
}

impl SizeCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached size for a key
    pub fn get(&self, key: &str) -> Option<u64> {
        self.sizes.get(key).map(|e| *e.value())
    }

    /// Record an authoritative size
    pub fn insert(&self, key: &str, size: u64) {
        self.sizes.insert(key.to_string(), size);
    }

    /// Drop a key after a write or delete
    pub fn invalidate(&self, key: &str) {
        self.sizes.remove(key);
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

/// Resolve the byte length of an already-resolved entry.
///
/// Prefers the cache, then the engine's stat; engines that expose no size
/// get their content streamed and counted once, and the result cached.
/// `None` means the size is genuinely unknowable right now.
pub async fn resolve_size<E: ContentEngine>(
    cache: &SizeCache,
    drive: &Drive<E>,
    key: &str,
    resolved: &ResolvedKey,
) -> Option<u64> {
    if let Some(hit) = cache.get(key) {
        return Some(hit);
    }
    if let Some(stat) = &resolved.stat {
        if stat.is_collection {
            return Some(0);
        }
        if let Some(size) = stat.size {
            cache.insert(key, size);
            return Some(size);
        }
    }
    let mut stream = drive.open_read_stream(&resolved.raw, None).await.ok()?;
    let mut total = 0u64;
    while let Some(chunk) = stream.next().await {
        total += chunk.ok()?.len() as u64;
    }
    cache.insert(key, total);
    Some(total)
}
