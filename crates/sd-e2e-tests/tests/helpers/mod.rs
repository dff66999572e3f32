//! Shared test harness for the end-to-end suites.
//!
//! Wires a real gateway router to a real `ToolServer` through the bridge,
//! skipping only the process boundary: the connector hands out transports
//! that dispatch straight into the provider. Both halves share one
//! knowledge fixture and one log file, as in production.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use sd_bridge::{
    BridgeError, BridgeResult, Connector, FailingConnector, ProviderTransport, ToolBridge,
};
use sd_gateway::routes::build_router;
use sd_gateway::state::AppState;
use sd_pipeline::{
    AnswerEnhancer, AskPipeline, EnhancerConfig, GenerativeEnhancer, InteractionLog, KnowledgeStore,
};
use sd_protocol::{KnowledgeEntry, WireRequest};
use sd_toolsrv::ToolServer;

/// Transport that dispatches straight into a `ToolServer`, no process.
pub struct InProcessTransport {
    server: Arc<ToolServer>,
}

#[async_trait]
impl ProviderTransport for InProcessTransport {
    async fn call(&self, request: WireRequest) -> BridgeResult<serde_json::Value> {
        let response = self.server.handle(request).await;
        match (response.result, response.error) {
            (Some(result), _) => Ok(result),
            (None, Some(error)) => Err(BridgeError::Provider(error)),
            (None, None) => Err(BridgeError::Provider("empty response frame".into())),
        }
    }
}

/// Connector handing out transports over one shared in-process provider.
pub struct InProcessConnector {
    server: Arc<ToolServer>,
    connect_delay: Duration,
    attempts: AtomicUsize,
}

impl InProcessConnector {
    pub fn new(server: ToolServer) -> Self {
        Self {
            server: Arc::new(server),
            connect_delay: Duration::ZERO,
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.connect_delay = delay;
        self
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for InProcessConnector {
    async fn connect(&self) -> BridgeResult<Arc<dyn ProviderTransport>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if !self.connect_delay.is_zero() {
            tokio::time::sleep(self.connect_delay).await;
        }
        Ok(Arc::new(InProcessTransport {
            server: self.server.clone(),
        }))
    }
}

/// Gateway + provider pair sharing one knowledge fixture and log file.
pub struct TestHarness {
    pub router: Router,
    /// Present when the harness was built with a working provider.
    pub connector: Option<Arc<InProcessConnector>>,
    _data_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Both halves up: remote-first routes reach the in-process provider.
    pub fn with_provider() -> Self {
        Self::build(true, None, None, Duration::ZERO)
    }

    /// Provider whose connect takes `delay`, for coalescing assertions.
    pub fn with_slow_provider(delay: Duration) -> Self {
        Self::build(true, None, None, delay)
    }

    /// Provider that rephrases answers through the given enhancer endpoint.
    pub fn with_enhancer(config: EnhancerConfig) -> Self {
        Self::build(true, Some(config), None, Duration::ZERO)
    }

    /// Provider never comes up: every remote-first route must fall back.
    pub fn without_provider() -> Self {
        Self::build(false, None, None, Duration::ZERO)
    }

    /// Provider down but an enhancer credential configured: the local
    /// fallback must keep the rephrasing step.
    pub fn without_provider_with_enhancer(config: EnhancerConfig) -> Self {
        Self::build(false, None, Some(config), Duration::ZERO)
    }

    fn build(
        provider: bool,
        remote_enhancer: Option<EnhancerConfig>,
        local_enhancer: Option<EnhancerConfig>,
        delay: Duration,
    ) -> Self {
        let data_dir = tempfile::tempdir().unwrap();
        let logs_path = data_dir.path().join("logs.json");

        let local = Arc::new(AskPipeline::new(
            KnowledgeStore::fixed(knowledge_fixture()),
            Arc::new(InteractionLog::new(&logs_path)),
            local_enhancer
                .map(|config| Arc::new(GenerativeEnhancer::new(config)) as Arc<dyn AnswerEnhancer>),
        ));

        let (bridge, connector) = if provider {
            let enhancer = remote_enhancer
                .map(|config| Arc::new(GenerativeEnhancer::new(config)) as Arc<dyn AnswerEnhancer>);
            let remote = AskPipeline::new(
                KnowledgeStore::fixed(knowledge_fixture()),
                Arc::new(InteractionLog::new(&logs_path)),
                enhancer,
            );
            let connector =
                Arc::new(InProcessConnector::new(ToolServer::new(remote)).with_delay(delay));
            let bridge: Arc<ToolBridge> = Arc::new(ToolBridge::new(connector.clone()));
            (bridge, Some(connector))
        } else {
            let bridge: Arc<ToolBridge> =
                Arc::new(ToolBridge::new(Arc::new(FailingConnector::new())));
            (bridge, None)
        };

        Self {
            router: build_router(AppState::new(local, bridge)),
            connector,
            _data_dir: data_dir,
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = self
            .router
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        split(response).await
    }

    pub async fn post(&self, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::post(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_vec(&body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        split(response).await
    }

    pub async fn ask(&self, question: &str) -> (StatusCode, serde_json::Value) {
        self.post("/api/ask", serde_json::json!({ "question": question }))
            .await
    }
}

async fn split(response: axum::response::Response) -> (StatusCode, serde_json::Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Small bilingual knowledge base shared by both execution paths.
pub fn knowledge_fixture() -> Vec<KnowledgeEntry> {
    vec![
        KnowledgeEntry {
            id: "F1".into(),
            title: "VPN connection keeps dropping".into(),
            content: "Re-import the VPN profile from the IT portal and reconnect.".into(),
            tags: vec!["vpn".into(), "network".into()],
        },
        KnowledgeEntry {
            id: "F2".into(),
            title: "Passwort zurücksetzen".into(),
            content: "Nutzen Sie das Self-Service-Portal, um das Passwort zurückzusetzen.".into(),
            tags: vec!["passwort".into(), "konto".into()],
        },
        KnowledgeEntry {
            id: "F3".into(),
            title: "Email sync on mobile".into(),
            content: "Remove and re-add the account in the mail app settings.".into(),
            tags: vec!["email".into(), "mobile".into()],
        },
    ]
}
