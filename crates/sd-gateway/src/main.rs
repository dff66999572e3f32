//! sd-gateway — HTTP front of the deflection service.
//!
//! Spawns nothing at startup: the tool provider is launched lazily by the
//! bridge on the first remote call, and every route keeps working off the
//! embedded pipeline when that spawn fails.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use sd_bridge::{StdioConnector, ToolBridge};
use sd_gateway::config::GatewayConfig;
use sd_gateway::listen::bind_with_retry;
use sd_gateway::routes::build_router;
use sd_gateway::state::AppState;
use sd_pipeline::{AskPipeline, GenerativeEnhancer, InteractionLog, KnowledgeStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "sd-gateway starting");

    let config = GatewayConfig::from_env();

    // The fallback pipeline gets the same enhancer the provider would
    // build, so a configured credential keeps working when the provider
    // is down.
    let enhancer = config
        .enhancer
        .clone()
        .map(|cfg| Arc::new(GenerativeEnhancer::new(cfg)) as _);
    let pipeline = Arc::new(AskPipeline::new(
        KnowledgeStore::file(&config.faq_path),
        Arc::new(InteractionLog::new(&config.logs_path)),
        enhancer,
    ));

    let mut connector = StdioConnector::new(config.toolsrv_command());
    connector.env = config.provider_env();
    let bridge = Arc::new(ToolBridge::new(Arc::new(connector)));

    let app = build_router(AppState::new(pipeline, bridge));

    let listener = bind_with_retry(&config.host, config.port).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
