//! Stdio transport — framed request/response over a spawned provider
//! process.
//!
//! Requests are single JSON lines on the child's stdin; a reader task
//! routes response lines back to waiting callers by request id, so one
//! connection serves concurrent calls. The child's stderr is inherited
//! (the provider logs there).

use std::collections::HashMap;
use std::process::Stdio;
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, Command};
use tokio::sync::{Mutex, oneshot};
use uuid::Uuid;

use sd_protocol::{OpName, WireRequest, WireResponse};

use crate::error::{BridgeError, BridgeResult};

/// One usable connection to a tool provider.
///
/// Implementations must be safe to share across concurrent callers.
#[async_trait]
pub trait ProviderTransport: Send + Sync {
    /// Issue one request and await its correlated response.
    async fn call(&self, request: WireRequest) -> BridgeResult<serde_json::Value>;
}

/// Establishes connections. Abstracted so the connection manager can be
/// tested without spawning real processes.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> BridgeResult<Arc<dyn ProviderTransport>>;
}

type PendingMap = Arc<StdMutex<HashMap<Uuid, oneshot::Sender<WireResponse>>>>;

/// Transport over a spawned subprocess's stdin/stdout.
pub struct StdioTransport {
    stdin: Mutex<ChildStdin>,
    pending: PendingMap,
    /// Held so the child is killed when the transport is dropped.
    _child: Child,
}

impl StdioTransport {
    /// Spawn the provider process and start the response reader task.
    pub fn spawn(
        command: &str,
        args: &[String],
        env: &[(String, String)],
    ) -> BridgeResult<Arc<Self>> {
        let mut child = Command::new(command)
            .args(args)
            .envs(env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| BridgeError::Spawn(e.to_string()))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| BridgeError::Spawn("child stdin not piped".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| BridgeError::Spawn("child stdout not piped".into()))?;

        let pending: PendingMap = Arc::new(StdMutex::new(HashMap::new()));

        let reader_pending = pending.clone();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }
                        match serde_json::from_str::<WireResponse>(line) {
                            Ok(response) => {
                                let waiter = reader_pending
                                    .lock()
                                    .expect("pending map lock poisoned")
                                    .remove(&response.id);
                                match waiter {
                                    // Send fails only if the caller gave up (timeout).
                                    Some(tx) => {
                                        let _ = tx.send(response);
                                    }
                                    None => {
                                        tracing::warn!(id = %response.id, "response for unknown request id")
                                    }
                                }
                            }
                            Err(e) => {
                                tracing::warn!(error = %e, "unparseable provider frame, skipping")
                            }
                        }
                    }
                    Ok(None) | Err(_) => break,
                }
            }
            // Stream closed: wake all waiters with a transport error by
            // dropping their senders.
            reader_pending
                .lock()
                .expect("pending map lock poisoned")
                .clear();
            tracing::debug!("provider stdout closed, reader task exiting");
        });

        Ok(Arc::new(Self {
            stdin: Mutex::new(stdin),
            pending,
            _child: child,
        }))
    }
}

#[async_trait]
impl ProviderTransport for StdioTransport {
    async fn call(&self, request: WireRequest) -> BridgeResult<serde_json::Value> {
        let id = request.id;
        let mut line =
            serde_json::to_string(&request).map_err(|e| BridgeError::Transport(e.to_string()))?;
        line.push('\n');

        let (tx, rx) = oneshot::channel();
        self.pending
            .lock()
            .expect("pending map lock poisoned")
            .insert(id, tx);

        let write_result = {
            let mut stdin = self.stdin.lock().await;
            async {
                stdin.write_all(line.as_bytes()).await?;
                stdin.flush().await
            }
            .await
        };
        if let Err(e) = write_result {
            self.pending
                .lock()
                .expect("pending map lock poisoned")
                .remove(&id);
            return Err(BridgeError::Transport(e.to_string()));
        }

        let response = rx
            .await
            .map_err(|_| BridgeError::Transport("provider stream closed".into()))?;

        match (response.result, response.error) {
            (Some(result), _) => Ok(result),
            (None, Some(message)) => Err(BridgeError::Provider(message)),
            (None, None) => Err(BridgeError::Provider("response had no result".into())),
        }
    }
}

/// Spawns the `sd-toolsrv` binary and performs the ping handshake.
#[derive(Debug, Clone)]
pub struct StdioConnector {
    pub command: String,
    pub args: Vec<String>,
    /// Environment passed to the provider (dataset paths, enhancer key).
    pub env: Vec<(String, String)>,
}

impl StdioConnector {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }
}

#[async_trait]
impl Connector for StdioConnector {
    async fn connect(&self) -> BridgeResult<Arc<dyn ProviderTransport>> {
        let transport = StdioTransport::spawn(&self.command, &self.args, &self.env)?;
        // The connection counts as established only once the provider
        // answers a ping; a hung process is caught by the connect timeout.
        transport
            .call(WireRequest::call(OpName::Ping, serde_json::json!({})))
            .await?;
        tracing::info!(command = %self.command, "tool provider connected");
        Ok(transport)
    }
}
