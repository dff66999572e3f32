//! Mock connectors for tests in dependent crates.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::{BridgeError, BridgeResult};
use crate::transport::{Connector, ProviderTransport};

/// Connector that never connects. Forces every remote-first caller down
/// the local fallback path.
#[derive(Debug, Default)]
pub struct FailingConnector {
    attempts: AtomicUsize,
}

impl FailingConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for FailingConnector {
    async fn connect(&self) -> BridgeResult<Arc<dyn ProviderTransport>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(BridgeError::Spawn("provider unavailable (mock)".into()))
    }
}
