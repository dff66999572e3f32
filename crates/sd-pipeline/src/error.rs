//! Pipeline error types.
//!
//! Unreadable datasets are deliberately NOT an error: a missing or
//! malformed file reads as an empty collection. Only writes can fail.

use thiserror::Error;

/// Errors from dataset writes.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("dataset I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("dataset serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Convenience alias for store results.
pub type StoreResult<T> = Result<T, StoreError>;
