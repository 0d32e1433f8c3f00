//! Crate error types

use thiserror::Error;

/// Errors surfaced by the monitoring core and its persistence layer.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Two channels declare the same input key. Raised when the registry
    /// index is built, not silently tolerated.
    #[error("duplicate channel input key: {0}")]
    DuplicateInputKey(String),

    /// Two channels declare the same output key.
    #[error("duplicate channel output key: {0}")]
    DuplicateOutputKey(String),

    #[error("snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MonitorError>;
