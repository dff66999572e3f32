//! Protocol bridge — the sole client of the tool-provider process.
//!
//! Lazily spawns/connects to the provider, coalesces concurrent connect
//! attempts into a single in-flight future, enforces connect and per-call
//! timeouts, and converts every failure into a typed [`BridgeError`] so
//! callers can fall back to the embedded pipeline. A remote empty result
//! is `Ok`; `Err` always means "unavailable, use the fallback".

pub mod error;
pub mod manager;
pub mod mock;
pub mod transport;

pub use error::{BridgeError, BridgeResult};
pub use manager::{CALL_TIMEOUT, CONNECT_TIMEOUT, ToolBridge};
pub use mock::FailingConnector;
pub use transport::{Connector, ProviderTransport, StdioConnector};
