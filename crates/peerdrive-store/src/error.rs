//! Error types for the peerdrive-store crate

use thiserror::Error;

/// Result type alias using `StoreError`
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur against a content engine
#[derive(Error, Debug)]
pub enum StoreError {
    /// Entry not found
    #[error("entry not found: {0}")]
    NotFound(String),

    /// Engine does not implement this operation
    #[error("engine does not support {0}")]
    Unsupported(&'static str),

    /// Key escapes the engine root or is otherwise unusable
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Every write strategy was exhausted
    #[error("all write strategies failed for {key}: {reason}")]
    WriteFailed { key: String, reason: String },

    /// Underlying I/O failure
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
