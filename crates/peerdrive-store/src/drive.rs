//! Canonical-key adapter over a raw content engine
//!
//! Legacy drives accept the same key under two textual forms, with and
//! without a leading slash. `Drive` owns that compatibility: it probes both
//! variants, keeps whichever form answered for the rest of the operation, and
//! hands canonical keys (no leading slash, no duplicate slashes) to
//! everything above it. The protocol layer never reasons about variants.

use crate::{
    chunk_stream, ByteRange, ByteStream, ContentEngine, EntryStat, Result, StoreError,
};
use bytes::Bytes;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Collapse duplicate slashes and strip leading/trailing ones.
///
/// The empty string is the root collection.
pub fn normalize_key(key: &str) -> String {
    key.split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Both textual forms a legacy engine may answer under
fn variants(key: &str) -> [String; 2] {
    [key.to_string(), format!("/{key}")]
}

/// A key located under a specific engine variant.
///
/// `raw` is the form the engine answered under; operations later in the same
/// request reuse it instead of re-probing.
#[derive(Debug, Clone)]
pub struct ResolvedKey {
    /// The variant the engine accepted
    pub raw: String,
    /// Metadata, when the engine could stat the key
    pub stat: Option<EntryStat>,
}

/// Ordered write strategies, tried until one succeeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStrategy {
    /// One-shot `put`
    DirectPut,
    /// Chunked `write_stream`
    StreamWrite,
}

/// The fixed preference order for writes
const WRITE_STRATEGIES: [WriteStrategy; 2] = [WriteStrategy::DirectPut, WriteStrategy::StreamWrite];

/// Canonical-key view of a content engine.
pub struct Drive<E: ContentEngine> {
    engine: Arc<E>,
}

impl<E: ContentEngine> Clone for Drive<E> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}

impl<E: ContentEngine> Drive<E> {
    /// Wrap an engine
    pub fn new(engine: E) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Whether this engine session may mutate the drive
    pub fn writable(&self) -> bool {
        self.engine.writable()
    }

    /// Locate a key under either variant.
    ///
    /// The root key always resolves as a collection. Engines that cannot stat
    /// are probed with a minimal one-byte read; a key that opens exists, with
    /// unknown metadata.
    pub async fn resolve(&self, key: &str) -> Result<Option<ResolvedKey>> {
        let key = normalize_key(key);
        if key.is_empty() {
            return Ok(Some(ResolvedKey {
                raw: String::new(),
                stat: Some(EntryStat::collection()),
            }));
        }
        for raw in variants(&key) {
            if let Ok(Some(stat)) = self.engine.stat(&raw).await {
                return Ok(Some(ResolvedKey {
                    raw,
                    stat: Some(stat),
                }));
            }
        }
        for raw in variants(&key) {
            if self
                .engine
                .read_stream(&raw, Some(ByteRange { start: 0, end: 0 }))
                .await
                .is_ok()
            {
                return Ok(Some(ResolvedKey { raw, stat: None }));
            }
        }
        Ok(None)
    }

    /// Fetch the full content of a key, probing both variants
    pub async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        let key = normalize_key(key);
        for raw in variants(&key) {
            if let Ok(Some(data)) = self.engine.get(&raw).await {
                return Ok(Some(data));
            }
        }
        Ok(None)
    }

    /// Open a chunk stream over an already-resolved raw key
    pub async fn open_read_stream(
        &self,
        raw: &str,
        range: Option<ByteRange>,
    ) -> Result<ByteStream> {
        self.engine.read_stream(raw, range).await
    }

    /// Write a key through the ordered strategy chain.
    ///
    /// A strategy the engine reports as unsupported falls through to the
    /// next; a real failure is retried under the other variant, then under
    /// the next strategy. Exhausting the chain is a hard failure.
    pub async fn write(&self, key: &str, data: Bytes) -> Result<()> {
        let key = normalize_key(key);
        let mut last_error: Option<StoreError> = None;
        for strategy in WRITE_STRATEGIES {
            for raw in variants(&key) {
                let attempt = match strategy {
                    WriteStrategy::DirectPut => self.engine.put(&raw, data.clone()).await,
                    WriteStrategy::StreamWrite => {
                        self.engine
                            .write_stream(&raw, chunk_stream(data.clone()))
                            .await
                    }
                };
                match attempt {
                    Ok(()) => return Ok(()),
                    Err(StoreError::Unsupported(_)) => break,
                    Err(e) => {
                        debug!(key = %key, strategy = ?strategy, error = %e, "write strategy failed");
                        last_error = Some(e);
                    }
                }
            }
        }
        Err(StoreError::WriteFailed {
            key,
            reason: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no write strategy available".to_string()),
        })
    }

    /// Remove a key under both variants; absence and engine refusals are
    /// swallowed so deletion stays idempotent
    pub async fn delete(&self, key: &str) -> Result<()> {
        let key = normalize_key(key);
        for raw in variants(&key) {
            if let Err(e) = self.engine.delete(&raw).await {
                debug!(key = %raw, error = %e, "delete variant failed");
            }
        }
        Ok(())
    }

    /// Immediate children of a collection, deduplicated across variants and
    /// returned as canonical keys
    pub async fn list(&self, key: &str) -> Result<Vec<String>> {
        let key = normalize_key(key);
        let mut seen = HashSet::new();
        let mut children = Vec::new();
        for raw in variants(&key) {
            if let Ok(listed) = self.engine.list(&raw).await {
                for child in listed {
                    let norm = normalize_key(&child);
                    if norm.is_empty() {
                        continue;
                    }
                    if seen.insert(norm.clone()) {
                        children.push(norm);
                    }
                }
            }
        }
        children.sort();
        Ok(children)
    }
}
