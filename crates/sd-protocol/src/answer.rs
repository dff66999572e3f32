//! Pipeline output types: classification, escalation verdicts, the full
//! ask response, and the metrics report.
//!
//! Both execution paths (remote tool provider and local fallback) must
//! produce these exact shapes, so they live in the shared protocol crate.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::RetrievalCandidate;

/// Result of intent classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentResult {
    pub intent: String,
    /// Fixed human-readable explanation for the matched rule.
    pub reason: String,
}

/// Why the escalation judge decided the way it did. Exactly one reason is
/// ever reported, in strict precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JudgeReason {
    LowConfidence,
    UnknownIntent,
    AnswerSuggestsEscalation,
    Ok,
}

/// Human-handoff decision for one interaction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub needs_human: bool,
    pub reason: JudgeReason,
}

/// A knowledge entry cited by an answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    pub id: String,
    pub title: String,
    pub score: f64,
}

/// Diagnostic trace attached to every ask response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskTrace {
    /// "remote" when served by the tool provider, "local" on fallback.
    pub path: String,
    pub intent_reason: String,
    pub judge_reason: JudgeReason,
    pub used_generative_enhancer: bool,
    pub latency_ms: u64,
}

/// Full response for one served question. Identical shape on both paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskResponse {
    pub answer: String,
    pub intent: String,
    pub confidence: f64,
    pub needs_human: bool,
    pub citations: Vec<Citation>,
    pub similar_items: Vec<RetrievalCandidate>,
    pub trace: AskTrace,
}

/// Ranked merged-search output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarResult {
    pub items: Vec<RetrievalCandidate>,
    pub confidence: f64,
}

/// Aggregate metrics over the interaction log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsReport {
    pub total: u64,
    /// Interactions resolved without human escalation.
    pub deflected: u64,
    pub deflection_rate: f64,
    pub avg_confidence: f64,
    pub max_confidence: f64,
    pub by_intent: BTreeMap<String, u64>,
}

/// Compact dataset view served by `GET /api/faqs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqSummary {
    pub count: usize,
    /// First 20 entry ids.
    pub ids: Vec<String>,
    /// First 2 full entries.
    pub sample: Vec<crate::model::KnowledgeEntry>,
}
