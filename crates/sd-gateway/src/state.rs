//! Shared application state for the Axum server.
//!
//! Every handler sees the same two halves: the bridge to the tool-provider
//! process (preferred) and the embedded pipeline (fallback, and the local
//! view of the datasets).

use std::sync::Arc;

use sd_bridge::{FailingConnector, ToolBridge};
use sd_pipeline::{AskPipeline, InteractionLog, KnowledgeStore};
use sd_protocol::KnowledgeEntry;

/// Shared application state, cheap to clone into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Embedded pipeline over the local datasets.
    pub pipeline: Arc<AskPipeline>,
    /// Bridge to the tool-provider process.
    pub bridge: Arc<ToolBridge>,
}

impl AppState {
    pub fn new(pipeline: Arc<AskPipeline>, bridge: Arc<ToolBridge>) -> Self {
        Self { pipeline, bridge }
    }

    /// In-memory state with sample entries and a provider that never
    /// connects, so every request exercises the local path. For router
    /// tests and development.
    pub fn with_sample_data() -> Self {
        let logs_path =
            std::env::temp_dir().join(format!("sd-gateway-logs-{}.json", uuid::Uuid::now_v7()));
        let pipeline = Arc::new(AskPipeline::new(
            KnowledgeStore::fixed(sample_entries()),
            Arc::new(InteractionLog::new(logs_path)),
            None,
        ));
        let bridge = Arc::new(ToolBridge::new(Arc::new(FailingConnector::new())));
        Self { pipeline, bridge }
    }
}

fn sample_entries() -> Vec<KnowledgeEntry> {
    vec![
        KnowledgeEntry {
            id: "KB-001".into(),
            title: "VPN connection keeps dropping".into(),
            content: "Re-import the VPN profile from the IT portal and reconnect.".into(),
            tags: vec!["vpn".into(), "network".into()],
        },
        KnowledgeEntry {
            id: "KB-002".into(),
            title: "Password reset".into(),
            content: "Use the self-service portal to reset your account password.".into(),
            tags: vec!["password".into(), "account".into()],
        },
        KnowledgeEntry {
            id: "KB-003".into(),
            title: "Email sync on mobile".into(),
            content: "Remove and re-add the account in the mail app settings.".into(),
            tags: vec!["email".into(), "mobile".into()],
        },
    ]
}
