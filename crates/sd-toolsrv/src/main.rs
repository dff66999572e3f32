//! sd-toolsrv — tool-provider process, driven entirely over stdio.
//!
//! Reads one JSON request frame per stdin line, writes one response frame
//! per stdout line. Logs go to stderr so they never corrupt the wire.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

use sd_toolsrv::{ProviderConfig, ToolServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = ProviderConfig::from_env();
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        faq_path = %config.faq_path,
        logs_path = %config.logs_path,
        enhancer = config.enhancer.is_some(),
        "sd-toolsrv starting"
    );

    let server = ToolServer::new(config.build_pipeline());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let Some(response) = server.handle_line(&line).await else {
            continue;
        };
        let mut frame = serde_json::to_string(&response)?;
        frame.push('\n');
        stdout.write_all(frame.as_bytes()).await?;
        stdout.flush().await?;
    }

    tracing::info!("stdin closed, shutting down");
    Ok(())
}
