//! Wire frames for the tool-provider stdio protocol.
//!
//! The bridge and the provider exchange newline-delimited JSON frames over
//! the provider's stdin/stdout. Requests carry a UUID for response
//! correlation, so calls may be issued concurrently over one connection.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Named operation exposed by the tool provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpName {
    /// Connect handshake; returns provider name and version.
    Ping,
    Classify,
    /// Knowledge-only search.
    Search,
    /// Merged knowledge + history search.
    Similar,
    /// Full pipeline: classify, retrieve, compose, judge, log.
    Ask,
    Metrics,
}

/// Named read-only dataset view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceName {
    Faq,
    Logs,
}

/// What a request asks the provider to do.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WirePayload {
    /// Invoke a named operation with structured arguments.
    Call {
        op: OpName,
        #[serde(default)]
        args: serde_json::Value,
    },
    /// Retrieve a read-only dataset view.
    Fetch { resource: ResourceName },
}

/// One framed request, written as a single JSON line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireRequest {
    pub id: Uuid,
    #[serde(flatten)]
    pub payload: WirePayload,
}

impl WireRequest {
    pub fn call(op: OpName, args: serde_json::Value) -> Self {
        Self {
            id: Uuid::now_v7(),
            payload: WirePayload::Call { op, args },
        }
    }

    pub fn fetch(resource: ResourceName) -> Self {
        Self {
            id: Uuid::now_v7(),
            payload: WirePayload::Fetch { resource },
        }
    }
}

/// One framed response. Exactly one of `result` / `error` is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireResponse {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WireResponse {
    pub fn ok(id: Uuid, result: serde_json::Value) -> Self {
        Self {
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn err(id: Uuid, message: impl Into<String>) -> Self {
        Self {
            id,
            result: None,
            error: Some(message.into()),
        }
    }
}

/// Arguments for `OpName::Classify`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyArgs {
    pub text: String,
}

/// Arguments for `OpName::Search` and `OpName::Similar`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchArgs {
    pub q: String,
    pub top_k: usize,
}

/// Arguments for `OpName::Ask`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskArgs {
    pub question: String,
}
