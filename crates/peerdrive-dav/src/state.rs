//! Application state

use crate::cache::SizeCache;
use crate::config::GatewayConfig;
use peerdrive_store::{Drive, FlexibleEngine, FsEngine, MemoryEngine};
use std::time::Instant;
use tracing::{info, warn};

/// Application state shared across handlers
pub struct AppState {
    /// Gateway configuration
    pub config: GatewayConfig,
    /// Canonical-key view of the content engine
    pub drive: Drive<FlexibleEngine>,
    /// Last-known entry sizes, process lifetime only
    pub size_cache: SizeCache,
    /// Boot instant, for the post-boot connection-closing window
    pub started_at: Instant,
}

impl AppState {
    /// Create application state, selecting the engine from configuration
    pub async fn new(config: GatewayConfig) -> anyhow::Result<Self> {
        let engine = if config.use_memory_store {
            warn!("using in-memory drive (data will not persist)");
            FlexibleEngine::Memory(MemoryEngine::new())
        } else if let Some(dir) = &config.data_dir {
            match FsEngine::new(dir).await {
                Ok(engine) => {
                    info!(dir = %dir.display(), "serving drive from local directory");
                    FlexibleEngine::Fs(engine)
                }
                Err(e) => {
                    warn!(
                        "failed to open data dir ({}), falling back to in-memory drive",
                        e
                    );
                    FlexibleEngine::Memory(MemoryEngine::new())
                }
            }
        } else {
            warn!("no data dir configured, using in-memory drive");
            FlexibleEngine::Memory(MemoryEngine::new())
        };

        if !engine.is_persistent() {
            warn!("storage mode: in-memory (NOT persistent)");
        }

        Ok(Self::with_engine(config, engine))
    }

    /// Create application state over an already-built engine
    pub fn with_engine(config: GatewayConfig, engine: FlexibleEngine) -> Self {
        Self {
            config,
            drive: Drive::new(engine),
            size_cache: SizeCache::new(),
            started_at: Instant::now(),
        }
    }

    /// Writes require a writable engine session and no read-only override
    pub fn allow_writes(&self) -> bool {
        self.drive.writable() && !self.config.read_only
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_flag_selects_the_memory_engine() {
        let config = GatewayConfig {
            use_memory_store: true,
            ..Default::default()
        };
        let state = AppState::new(config).await.unwrap();
        assert!(state.allow_writes());
    }

    #[test]
    fn read_only_flag_blocks_writes() {
        let config = GatewayConfig {
            read_only: true,
            ..Default::default()
        };
        let state = AppState::with_engine(config, FlexibleEngine::Memory(MemoryEngine::new()));
        assert!(!state.allow_writes());
    }

    #[test]
    fn unwritable_engine_sessions_block_writes() {
        let state = AppState::with_engine(
            GatewayConfig::default(),
            FlexibleEngine::Memory(MemoryEngine::read_only()),
        );
        assert!(!state.allow_writes());
    }
}
