//! Tool provider — exposes the pipeline as named stdio operations.
//!
//! The gateway's protocol bridge spawns this binary and is its only
//! client. Frames are newline-delimited JSON on stdin/stdout; all logging
//! goes to stderr because stdout is the wire.

pub mod config;
pub mod server;

pub use config::ProviderConfig;
pub use server::ToolServer;
