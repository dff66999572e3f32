//! Bridge error types.
//!
//! Every variant means the same thing to callers: the remote path is
//! unavailable and the local fallback should run. The variants exist for
//! logging and tests, not for per-variant handling.
//!
//! `Clone` is required because connect errors are delivered through a
//! shared single-flight future to every coalesced caller.

use std::time::Duration;

use thiserror::Error;

/// Errors from the protocol bridge.
#[derive(Debug, Clone, Error)]
pub enum BridgeError {
    #[error("failed to spawn tool provider: {0}")]
    Spawn(String),

    #[error("connect attempt timed out after {0:?}")]
    ConnectTimeout(Duration),

    #[error("remote call timed out after {0:?}")]
    CallTimeout(Duration),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("provider error: {0}")]
    Provider(String),
}

/// Convenience alias for bridge results.
pub type BridgeResult<T> = Result<T, BridgeError>;
