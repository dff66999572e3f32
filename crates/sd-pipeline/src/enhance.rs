//! Generative enhancer — optional rephrasing of the deterministic answer
//! through an OpenAI-compatible chat endpoint.
//!
//! Strictly best-effort: every failure path (HTTP error, timeout,
//! unparseable body, empty completion) returns `None` and the caller keeps
//! the deterministic template. Absence of a credential disables only this
//! module, never the pipeline.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use sd_protocol::RetrievalCandidate;

use crate::compose::AnswerEnhancer;

const SYSTEM_PROMPT: &str = "You rephrase internal IT service-desk answers. \
Ground your answer strictly in the provided knowledge entry; do not invent \
steps, links, or contacts. Answer in the language of the question, briefly.";

/// Configuration for the enhancer endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct EnhancerConfig {
    pub api_key: String,
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_url() -> String {
    "https://api.openai.com/v1/chat/completions".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_timeout_secs() -> u64 {
    8
}

impl EnhancerConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            url: default_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Read the credential and endpoint overrides from the environment.
    /// `None` when `SD_ENHANCER_API_KEY` is unset or empty; both the
    /// provider and the gateway's local fallback build from this, so a
    /// configured enhancer survives on either execution path.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let key = get("SD_ENHANCER_API_KEY").filter(|key| !key.is_empty())?;
        let mut config = Self::new(key);
        if let Some(url) = get("SD_ENHANCER_URL") {
            config.url = url;
        }
        if let Some(model) = get("SD_ENHANCER_MODEL") {
            config.model = model;
        }
        Some(config)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response fields we need; everything else is ignored.
#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Chat-completions client implementing [`AnswerEnhancer`].
pub struct GenerativeEnhancer {
    client: reqwest::Client,
    config: EnhancerConfig,
}

impl GenerativeEnhancer {
    pub fn new(config: EnhancerConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self { client, config }
    }
}

#[async_trait]
impl AnswerEnhancer for GenerativeEnhancer {
    async fn enhance(
        &self,
        question: &str,
        intent: &str,
        top: &RetrievalCandidate,
    ) -> Option<String> {
        let user_prompt = format!(
            "Question ({intent}): {question}\n\nKnowledge entry {id} — {title}:\n{content}",
            id = top.id,
            title = top.title,
            content = top.content.as_deref().unwrap_or_default(),
        );
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &user_prompt,
                },
            ],
        };

        let response = match self
            .client
            .post(&self.config.url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "enhancer request failed, keeping deterministic answer");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "enhancer returned non-success status");
            return None;
        }

        let parsed: ChatResponse = match response.json().await {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(error = %e, "enhancer response was not parseable");
                return None;
            }
        };

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
    }
}
