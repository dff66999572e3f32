//! Answer composer — deterministic templates, optionally replaced by a
//! generative rephrasing.
//!
//! The enhancer may swap the answer text only. Score, intent, and the
//! escalation verdict are always derived from the deterministic template,
//! and an enhancer failure silently falls back to it.

use async_trait::async_trait;

use sd_protocol::RetrievalCandidate;

/// Served when retrieval comes back empty.
///
/// The wording deliberately avoids the judge's escalation phrase set; the
/// empty-retrieval case is already caught by the confidence floor.
pub const NO_MATCH_ANSWER: &str = "I could not find a matching entry in the knowledge base. \
Please contact the IT service desk directly so a colleague can pick this up.";

/// Appended to every composed answer. Must not contain judge escalation
/// phrases, otherwise every interaction would be flagged for handoff.
const FOLLOW_UP_SUFFIX: &str =
    "If this does not solve the problem, reply to this message and a support agent will take over.";

/// Build the deterministic answer from ranked candidates.
pub fn compose(candidates: &[RetrievalCandidate]) -> String {
    match candidates.first() {
        None => NO_MATCH_ANSWER.to_string(),
        Some(top) => format!(
            "{title} [{id}]\n\n{content}\n\n{FOLLOW_UP_SUFFIX}",
            title = top.title,
            id = top.id,
            content = top.content.as_deref().unwrap_or_default(),
        ),
    }
}

/// Optional generative rephrasing of the deterministic answer.
///
/// Implementations return `None` on any failure; callers must treat that
/// as "keep the deterministic text", never as an error.
#[async_trait]
pub trait AnswerEnhancer: Send + Sync {
    async fn enhance(
        &self,
        question: &str,
        intent: &str,
        top: &RetrievalCandidate,
    ) -> Option<String>;
}
