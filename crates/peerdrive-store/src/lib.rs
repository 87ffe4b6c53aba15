//! # Peerdrive Store
//!
//! Content drive abstraction for the peerdrive WebDAV gateway.
//!
//! This crate provides:
//! - **The engine contract**: the [`ContentEngine`] trait the gateway consumes
//! - **Engines**: in-memory and local-directory implementations
//! - **The drive adapter**: canonical keys, legacy key-variant probing, and
//!   the ordered write-strategy chain
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           WebDAV Gateway                │
//! ├─────────────────────────────────────────┤
//! │         Drive (canonical keys)          │
//! ├─────────────────────────────────────────┤
//! │          ContentEngine Trait            │
//! ├────────────────────┬────────────────────┤
//! │    MemoryEngine    │      FsEngine      │
//! └────────────────────┴────────────────────┘
//! ```
//!
//! The replicated storage layer that actually owns content across peers sits
//! behind [`ContentEngine`]; anything that can answer the trait can be served.
//!
//! ## Example
//!
//! ```rust,ignore
//! use peerdrive_store::{Drive, MemoryEngine};
//!
//! let drive = Drive::new(MemoryEngine::new());
//! drive.write("notes.txt", Bytes::from("hello")).await?;
//! let data = drive.get("notes.txt").await?;
//! ```

pub mod drive;
pub mod error;
pub mod flexible;
pub mod fs;
pub mod memory;

pub use drive::{normalize_key, Drive, ResolvedKey, WriteStrategy};
pub use error::{Result, StoreError};
pub use flexible::FlexibleEngine;
pub use fs::FsEngine;
pub use memory::MemoryEngine;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::stream::{self, BoxStream, StreamExt};

/// Chunk size used when turning buffered content into a stream (256 KB)
pub const DEFAULT_CHUNK_SIZE: usize = 256 * 1024;

/// Inclusive byte window into a stored entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    /// First byte offset, inclusive
    pub start: u64,
    /// Last byte offset, inclusive
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes covered by the window
    pub fn byte_len(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// Metadata for a stored entry or virtual collection.
#[derive(Debug, Clone)]
pub struct EntryStat {
    /// Whether the entry is a directory-like collection
    pub is_collection: bool,
    /// Byte length, when the engine tracks it
    pub size: Option<u64>,
    /// Last modification time, when the engine tracks it
    pub modified: Option<DateTime<Utc>>,
}

impl EntryStat {
    /// Stat for a virtual collection
    pub fn collection() -> Self {
        Self {
            is_collection: true,
            size: None,
            modified: None,
        }
    }

    /// Stat for a regular entry
    pub fn entry(size: Option<u64>, modified: Option<DateTime<Utc>>) -> Self {
        Self {
            is_collection: false,
            size,
            modified,
        }
    }
}

/// Stream of content chunks produced by an engine.
pub type ByteStream = BoxStream<'static, Result<Bytes>>;

/// Split buffered content into a chunked [`ByteStream`].
pub fn chunk_stream(data: Bytes) -> ByteStream {
    let mut chunks = Vec::with_capacity(data.len() / DEFAULT_CHUNK_SIZE + 1);
    let mut rest = data;
    while rest.len() > DEFAULT_CHUNK_SIZE {
        chunks.push(Ok(rest.split_to(DEFAULT_CHUNK_SIZE)));
    }
    chunks.push(Ok(rest));
    stream::iter(chunks).boxed()
}

/// Trait for raw content engines.
///
/// All lookups may fail; callers treat failures as "resource absent" rather
/// than fatal. Engines without a given write primitive leave the default
/// implementation in place, and the [`Drive`] strategy chain falls through to
/// the next one.
#[async_trait]
pub trait ContentEngine: Send + Sync {
    /// Fetch the full content of a key, `None` when absent
    async fn get(&self, key: &str) -> Result<Option<Bytes>>;

    /// Write the full content of a key in one shot
    async fn put(&self, key: &str, data: Bytes) -> Result<()> {
        let _ = (key, data);
        Err(StoreError::Unsupported("put"))
    }

    /// Write a key from a stream of chunks
    async fn write_stream(&self, key: &str, data: ByteStream) -> Result<()> {
        let _ = (key, data);
        Err(StoreError::Unsupported("write_stream"))
    }

    /// Remove a key; removing an absent key is not an error
    async fn delete(&self, key: &str) -> Result<()>;

    /// Immediate children of a prefix, one level deep.
    ///
    /// A legacy engine may report the same child under both leading-slash
    /// variants; deduplication happens in [`Drive::list`].
    async fn list(&self, prefix: &str) -> Result<Vec<String>>;

    /// Metadata for a key, `None` when absent
    async fn stat(&self, key: &str) -> Result<Option<EntryStat>>;

    /// Open a chunk stream over a key, optionally windowed to a byte range
    async fn read_stream(&self, key: &str, range: Option<ByteRange>) -> Result<ByteStream>;

    /// Whether this engine session may mutate the drive
    fn writable(&self) -> bool;
}
