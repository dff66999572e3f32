//! Connection manager — explicit state machine with single-flight connect
//! coalescing.
//!
//! `Disconnected → Connecting → Connected`, any failure back to
//! `Disconnected`. While `Connecting`, every caller awaits a clone of the
//! same shared future, so at most one connect attempt is ever in flight.
//! There is no backoff: every call after a failure is a fresh opportunity
//! to reconnect.

use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use sd_protocol::{
    AskArgs, AskResponse, ClassifyArgs, IntentResult, InteractionRecord, KnowledgeEntry,
    MetricsReport, OpName, ResourceName, SearchArgs, SimilarResult, WireRequest,
};

use crate::error::{BridgeError, BridgeResult};
use crate::transport::{Connector, ProviderTransport};

/// Hard cutoff for establishing a connection.
pub const CONNECT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Bound on already-connected remote calls, so an unresponsive provider
/// cannot stall a request indefinitely.
pub const CALL_TIMEOUT: Duration = Duration::from_secs(15);

type ConnectFuture = Shared<BoxFuture<'static, BridgeResult<Arc<dyn ProviderTransport>>>>;

enum ConnectionState {
    Disconnected,
    Connecting(ConnectFuture),
    Connected(Arc<dyn ProviderTransport>),
}

/// Client-side bridge to the tool provider.
pub struct ToolBridge {
    connector: Arc<dyn Connector>,
    state: Mutex<ConnectionState>,
    connect_timeout: Duration,
    call_timeout: Duration,
}

impl ToolBridge {
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self::with_timeouts(connector, CONNECT_TIMEOUT, CALL_TIMEOUT)
    }

    pub fn with_timeouts(
        connector: Arc<dyn Connector>,
        connect_timeout: Duration,
        call_timeout: Duration,
    ) -> Self {
        Self {
            connector,
            state: Mutex::new(ConnectionState::Disconnected),
            connect_timeout,
            call_timeout,
        }
    }

    /// Get the cached transport, or join/start the single connect attempt.
    async fn transport(&self) -> BridgeResult<Arc<dyn ProviderTransport>> {
        let attempt = {
            let mut state = self.state.lock().await;
            match &*state {
                ConnectionState::Connected(transport) => return Ok(transport.clone()),
                ConnectionState::Connecting(attempt) => attempt.clone(),
                ConnectionState::Disconnected => {
                    let connector = self.connector.clone();
                    let timeout = self.connect_timeout;
                    let attempt: ConnectFuture = async move {
                        match tokio::time::timeout(timeout, connector.connect()).await {
                            Ok(result) => result,
                            Err(_) => Err(BridgeError::ConnectTimeout(timeout)),
                        }
                    }
                    .boxed()
                    .shared();
                    *state = ConnectionState::Connecting(attempt.clone());
                    attempt
                }
            }
        };

        let result = attempt.clone().await;

        // Settle the state, but only if no newer attempt superseded this
        // one in the meantime.
        let mut state = self.state.lock().await;
        if let ConnectionState::Connecting(current) = &*state
            && current.ptr_eq(&attempt)
        {
            *state = match &result {
                Ok(transport) => ConnectionState::Connected(transport.clone()),
                Err(e) => {
                    tracing::warn!(error = %e, "tool provider connect failed");
                    ConnectionState::Disconnected
                }
            };
        }
        result
    }

    /// Drop the cached handle so the next call reconnects from scratch.
    async fn disconnect(&self) {
        let mut state = self.state.lock().await;
        *state = ConnectionState::Disconnected;
    }

    /// Issue one raw request with the per-call timeout. Any error clears
    /// the cached connection.
    pub async fn call(&self, request: WireRequest) -> BridgeResult<serde_json::Value> {
        let transport = self.transport().await?;
        match tokio::time::timeout(self.call_timeout, transport.call(request)).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "remote call failed, dropping connection");
                self.disconnect().await;
                Err(e)
            }
            Err(_) => {
                tracing::warn!("remote call timed out, dropping connection");
                self.disconnect().await;
                Err(BridgeError::CallTimeout(self.call_timeout))
            }
        }
    }

    async fn op<T: DeserializeOwned>(
        &self,
        op: OpName,
        args: serde_json::Value,
    ) -> BridgeResult<T> {
        let result = self.call(WireRequest::call(op, args)).await?;
        serde_json::from_value(result)
            .map_err(|e| BridgeError::Provider(format!("malformed {op:?} result: {e}")))
    }

    async fn fetch<T: DeserializeOwned>(&self, resource: ResourceName) -> BridgeResult<T> {
        let result = self.call(WireRequest::fetch(resource)).await?;
        serde_json::from_value(result)
            .map_err(|e| BridgeError::Provider(format!("malformed {resource:?} resource: {e}")))
    }

    // ── Typed operation wrappers ──────────────────────────────

    pub async fn classify(&self, text: &str) -> BridgeResult<IntentResult> {
        let args = serde_json::to_value(ClassifyArgs { text: text.into() })
            .map_err(|e| BridgeError::Transport(e.to_string()))?;
        self.op(OpName::Classify, args).await
    }

    pub async fn search(&self, q: &str, top_k: usize) -> BridgeResult<SimilarResult> {
        let args = serde_json::to_value(SearchArgs { q: q.into(), top_k })
            .map_err(|e| BridgeError::Transport(e.to_string()))?;
        self.op(OpName::Search, args).await
    }

    pub async fn similar(&self, q: &str, top_k: usize) -> BridgeResult<SimilarResult> {
        let args = serde_json::to_value(SearchArgs { q: q.into(), top_k })
            .map_err(|e| BridgeError::Transport(e.to_string()))?;
        self.op(OpName::Similar, args).await
    }

    pub async fn ask(&self, question: &str) -> BridgeResult<AskResponse> {
        let args = serde_json::to_value(AskArgs {
            question: question.into(),
        })
        .map_err(|e| BridgeError::Transport(e.to_string()))?;
        self.op(OpName::Ask, args).await
    }

    pub async fn metrics(&self) -> BridgeResult<MetricsReport> {
        self.op(OpName::Metrics, serde_json::json!({})).await
    }

    pub async fn fetch_faq(&self) -> BridgeResult<Vec<KnowledgeEntry>> {
        self.fetch(ResourceName::Faq).await
    }

    pub async fn fetch_logs(&self) -> BridgeResult<Vec<InteractionRecord>> {
        self.fetch(ResourceName::Logs).await
    }
}
