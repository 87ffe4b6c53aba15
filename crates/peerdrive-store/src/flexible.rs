//! Engine selection at runtime

use crate::{ByteRange, ByteStream, ContentEngine, EntryStat, FsEngine, MemoryEngine, Result};
use async_trait::async_trait;
use bytes::Bytes;

/// Content engine chosen at startup.
///
/// The gateway serves whichever engine configuration selected, without being
/// generic over it.
pub enum FlexibleEngine {
    /// Local-directory engine (persistent)
    Fs(FsEngine),
    /// In-memory engine (development fallback)
    Memory(MemoryEngine),
}

impl FlexibleEngine {
    /// Whether entries survive a restart
    pub fn is_persistent(&self) -> bool {
        matches!(self, Self::Fs(_))
    }
}

#[async_trait]
impl ContentEngine for FlexibleEngine {
    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        match self {
            Self::Fs(engine) => engine.get(key).await,
            Self::Memory(engine) => engine.get(key).await,
        }
    }

    async fn put(&self, key: &str, data: Bytes) -> Result<()> {
        match self {
            Self::Fs(engine) => engine.put(key, data).await,
            Self::Memory(engine) => engine.put(key, data).await,
        }
    }

    async fn write_stream(&self, key: &str, data: ByteStream) -> Result<()> {
        match self {
            Self::Fs(engine) => engine.write_stream(key, data).await,
            Self::Memory(engine) => engine.write_stream(key, data).await,
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        match self {
            Self::Fs(engine) => engine.delete(key).await,
            Self::Memory(engine) => engine.delete(key).await,
        }
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        match self {
            Self::Fs(engine) => engine.list(prefix).await,
            Self::Memory(engine) => engine.list(prefix).await,
        }
    }

    async fn stat(&self, key: &str) -> Result<Option<EntryStat>> {
        match self {
            Self::Fs(engine) => engine.stat(key).await,
            Self::Memory(engine) => engine.stat(key).await,
        }
    }

    async fn read_stream(&self, key: &str, range: Option<ByteRange>) -> Result<ByteStream> {
        match self {
            Self::Fs(engine) => engine.read_stream(key, range).await,
            Self::Memory(engine) => engine.read_stream(key, range).await,
        }
    }

    fn writable(&self) -> bool {
        match self {
            Self::Fs(engine) => engine.writable(),
            Self::Memory(engine) => engine.writable(),
        }
    }
}
