//! Gateway configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Largest PUT body accepted inline, in bytes (16 MiB).
///
/// Larger uploads belong on the drive's out-of-band ingest path instead of
/// being buffered through the gateway.
pub const INLINE_PUT_CAP: u64 = 16 * 1024 * 1024;

/// Gateway server configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Mount prefix the drive is served under
    pub mount: String,
    /// Directory for the local-directory engine
    pub data_dir: Option<PathBuf>,
    /// Use in-memory storage (for testing/development)
    pub use_memory_store: bool,
    /// Refuse every mutating method, regardless of the engine session
    pub read_only: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 4919,
            mount: "/dav".to_string(),
            data_dir: None,
            use_memory_store: false,
            read_only: false,
        }
    }
}

impl GatewayConfig {
    /// Get the bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
