//! Provider configuration from environment variables.
//!
//! The bridge passes these through when it spawns the process, so the
//! provider and the gateway's local fallback always see the same datasets.

use std::sync::Arc;

use sd_pipeline::{AskPipeline, EnhancerConfig, GenerativeEnhancer, InteractionLog, KnowledgeStore};

/// Environment-driven provider settings.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub faq_path: String,
    pub logs_path: String,
    /// Present only when the enhancer credential is set; its absence
    /// disables nothing but the rephrasing step.
    pub enhancer: Option<EnhancerConfig>,
}

impl ProviderConfig {
    pub fn from_env() -> Self {
        let faq_path =
            std::env::var("SD_FAQ_PATH").unwrap_or_else(|_| "data/faq.json".to_string());
        let logs_path =
            std::env::var("SD_LOGS_PATH").unwrap_or_else(|_| "data/logs.json".to_string());

        Self {
            faq_path,
            logs_path,
            enhancer: EnhancerConfig::from_env(),
        }
    }

    /// Build the pipeline this provider serves.
    pub fn build_pipeline(&self) -> AskPipeline {
        let enhancer = self
            .enhancer
            .clone()
            .map(|config| Arc::new(GenerativeEnhancer::new(config)) as _);
        AskPipeline::new(
            KnowledgeStore::file(&self.faq_path),
            Arc::new(InteractionLog::new(&self.logs_path)),
            enhancer,
        )
    }
}
