//! Gateway configuration from environment variables.

use sd_pipeline::EnhancerConfig;

/// Top-level gateway settings.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Listen address (e.g., "0.0.0.0").
    pub host: String,
    /// Preferred listen port; the binary walks upward from here when the
    /// port is taken.
    pub port: u16,
    /// Knowledge dataset path, shared with the spawned provider.
    pub faq_path: String,
    /// Interaction log path, shared with the spawned provider.
    pub logs_path: String,
    /// Explicit tool-provider command (`SD_TOOLSRV_BIN`). When unset, the
    /// sibling `sd-toolsrv` binary next to the gateway executable is used.
    pub toolsrv_bin: Option<String>,
    /// Present only when the enhancer credential is set. The local
    /// fallback pipeline builds from this, so answers served while the
    /// provider is down keep the rephrasing step.
    pub enhancer: Option<EnhancerConfig>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const DEFAULT_PORT: u16 = 3000;

impl GatewayConfig {
    /// Load config from environment variables.
    pub fn from_env() -> Self {
        let host = std::env::var("SD_HOST").unwrap_or_else(|_| default_host());
        let port = std::env::var("SD_PORT")
            .ok()
            .and_then(|raw| match raw.parse() {
                Ok(port) => Some(port),
                Err(_) => {
                    tracing::warn!(raw = %raw, "unparseable SD_PORT, using default");
                    None
                }
            })
            .unwrap_or(DEFAULT_PORT);

        Self {
            host,
            port,
            faq_path: std::env::var("SD_FAQ_PATH").unwrap_or_else(|_| "data/faq.json".to_string()),
            logs_path: std::env::var("SD_LOGS_PATH")
                .unwrap_or_else(|_| "data/logs.json".to_string()),
            toolsrv_bin: std::env::var("SD_TOOLSRV_BIN").ok().filter(|v| !v.is_empty()),
            enhancer: EnhancerConfig::from_env(),
        }
    }

    /// Resolve the provider command: the env override, or the `sd-toolsrv`
    /// binary installed next to the gateway executable.
    pub fn toolsrv_command(&self) -> String {
        if let Some(bin) = &self.toolsrv_bin {
            return bin.clone();
        }
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join("sd-toolsrv")))
            .map(|path| path.to_string_lossy().into_owned())
            .unwrap_or_else(|| "sd-toolsrv".to_string())
    }

    /// Environment handed to the spawned provider, so both processes see
    /// the same datasets and enhancer credentials.
    pub fn provider_env(&self) -> Vec<(String, String)> {
        let mut env = vec![
            ("SD_FAQ_PATH".to_string(), self.faq_path.clone()),
            ("SD_LOGS_PATH".to_string(), self.logs_path.clone()),
        ];
        for key in [
            "SD_ENHANCER_API_KEY",
            "SD_ENHANCER_URL",
            "SD_ENHANCER_MODEL",
            "RUST_LOG",
        ] {
            if let Ok(value) = std::env::var(key) {
                env.push((key.to_string(), value));
            }
        }
        env
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: DEFAULT_PORT,
            faq_path: "data/faq.json".to_string(),
            logs_path: "data/logs.json".to_string(),
            toolsrv_bin: None,
            enhancer: None,
        }
    }
}
