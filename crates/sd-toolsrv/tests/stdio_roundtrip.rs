//! Process-level roundtrip: the real sd-toolsrv binary, spawned and driven
//! through the bridge exactly as the gateway does it.

use std::sync::Arc;

use sd_bridge::{StdioConnector, ToolBridge};

fn connector(dir: &tempfile::TempDir) -> StdioConnector {
    let faq_path = dir.path().join("faq.json");
    std::fs::write(
        &faq_path,
        r#"[{"id":"F1","title":"VPN setup","content":"Connect via client X","tags":["vpn"]}]"#,
    )
    .unwrap();

    let mut connector = StdioConnector::new(env!("CARGO_BIN_EXE_sd-toolsrv"));
    connector.env = vec![
        (
            "SD_FAQ_PATH".to_string(),
            faq_path.to_string_lossy().into_owned(),
        ),
        (
            "SD_LOGS_PATH".to_string(),
            dir.path().join("logs.json").to_string_lossy().into_owned(),
        ),
    ];
    connector
}

#[tokio::test]
async fn classify_and_search_over_real_stdio() {
    let dir = tempfile::tempdir().unwrap();
    let bridge = ToolBridge::new(Arc::new(connector(&dir)));

    let intent = bridge.classify("mein VPN ist kaputt").await.unwrap();
    assert_eq!(intent.intent, "network_vpn");

    let search = bridge.search("vpn", 5).await.unwrap();
    assert_eq!(search.items.len(), 1);
    assert_eq!(search.items[0].id, "F1");
}

#[tokio::test]
async fn ask_logs_remotely_and_metrics_see_it() {
    let dir = tempfile::tempdir().unwrap();
    let bridge = ToolBridge::new(Arc::new(connector(&dir)));

    let response = bridge.ask("my vpn is broken").await.unwrap();
    assert_eq!(response.trace.path, "remote");
    assert!(!response.needs_human);

    let metrics = bridge.metrics().await.unwrap();
    assert_eq!(metrics.total, 1);

    let logs = bridge.fetch_logs().await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].channel.as_deref(), Some("tools"));
}

#[tokio::test]
async fn concurrent_calls_share_one_provider_process() {
    let dir = tempfile::tempdir().unwrap();
    let bridge = Arc::new(ToolBridge::new(Arc::new(connector(&dir))));

    let (a, b, c) = tokio::join!(
        bridge.classify("vpn"),
        bridge.classify("passwort vergessen"),
        bridge.fetch_faq(),
    );
    assert_eq!(a.unwrap().intent, "network_vpn");
    assert_eq!(b.unwrap().intent, "account_access");
    assert_eq!(c.unwrap().len(), 1);
}

#[tokio::test]
async fn provider_error_is_not_a_transport_failure() {
    let dir = tempfile::tempdir().unwrap();
    let bridge = ToolBridge::new(Arc::new(connector(&dir)));

    let err = bridge.ask("   ").await.unwrap_err();
    assert!(matches!(err, sd_bridge::BridgeError::Provider(_)));
}
