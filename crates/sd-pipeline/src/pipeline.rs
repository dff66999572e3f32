//! Ask pipeline — the full classify → retrieve → compose → judge → log
//! sequence, shared by the tool provider and the local fallback path.
//!
//! Both paths must produce byte-identical response shapes; only the trace
//! path and the log record's `channel` field differ.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;

use sd_protocol::{
    AskResponse, AskTrace, Citation, FaqSummary, InteractionRecord, IntentResult, MetricsReport,
    SimilarResult,
};

use crate::compose::{AnswerEnhancer, compose};
use crate::store::{InteractionLog, KnowledgeStore};
use crate::{intent, judge, merge, metrics, retrieve};

/// How many knowledge entries back an answer.
pub const ASK_TOP_K: usize = 3;
/// How many merged candidates are attached as similar items.
pub const SIMILAR_TOP_K: usize = 5;

/// Which execution path is running the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AskOrigin {
    /// Embedded fallback inside the gateway process.
    Local,
    /// The tool-provider process.
    Provider,
}

impl AskOrigin {
    fn trace_path(self) -> &'static str {
        match self {
            AskOrigin::Local => "local",
            AskOrigin::Provider => "remote",
        }
    }

    fn channel(self) -> Option<String> {
        match self {
            AskOrigin::Local => None,
            AskOrigin::Provider => Some("tools".to_string()),
        }
    }
}

/// Retrieval/decision pipeline over the two datasets.
pub struct AskPipeline {
    knowledge: KnowledgeStore,
    log: Arc<InteractionLog>,
    enhancer: Option<Arc<dyn AnswerEnhancer>>,
}

impl AskPipeline {
    pub fn new(
        knowledge: KnowledgeStore,
        log: Arc<InteractionLog>,
        enhancer: Option<Arc<dyn AnswerEnhancer>>,
    ) -> Self {
        Self {
            knowledge,
            log,
            enhancer,
        }
    }

    pub fn log(&self) -> &InteractionLog {
        &self.log
    }

    /// Full knowledge dataset, for the provider's resource view.
    pub async fn knowledge(&self) -> Vec<sd_protocol::KnowledgeEntry> {
        self.knowledge.load().await
    }

    pub fn classify(&self, text: &str) -> IntentResult {
        intent::classify(text)
    }

    /// Knowledge-only ranked search.
    pub async fn search(&self, query: &str, top_k: usize) -> SimilarResult {
        retrieve::search(&self.knowledge.load().await, query, top_k)
    }

    /// Merged knowledge + history search.
    pub async fn similar(&self, query: &str, top_k: usize) -> SimilarResult {
        let entries = self.knowledge.load().await;
        let records = self.log.read_all().await;
        merge::merged_search(&entries, &records, query, top_k)
    }

    pub async fn metrics(&self) -> MetricsReport {
        metrics::aggregate(&self.log.read_all().await)
    }

    /// Compact knowledge-base view for `GET /api/faqs`.
    pub async fn faq_summary(&self) -> FaqSummary {
        let entries = self.knowledge.load().await;
        FaqSummary {
            count: entries.len(),
            ids: entries.iter().take(20).map(|e| e.id.clone()).collect(),
            sample: entries.iter().take(2).cloned().collect(),
        }
    }

    /// Serve one question end to end and append a log record.
    pub async fn ask(&self, question: &str, origin: AskOrigin) -> AskResponse {
        let start = Instant::now();

        let classified = intent::classify(question);
        let entries = self.knowledge.load().await;
        let retrieved = retrieve::search(&entries, question, ASK_TOP_K);

        let deterministic = compose(&retrieved.items);
        // The verdict is always derived from the deterministic answer so
        // the enhancer can never change the escalation decision.
        let verdict = judge::judge(retrieved.confidence, &classified.intent, &deterministic);

        let (answer, enhanced) = match (&self.enhancer, retrieved.items.first()) {
            (Some(enhancer), Some(top)) => {
                match enhancer.enhance(question, &classified.intent, top).await {
                    Some(text) => (text, true),
                    None => (deterministic, false),
                }
            }
            _ => (deterministic, false),
        };

        let records = self.log.read_all().await;
        let similar = merge::merged_search(&entries, &records, question, SIMILAR_TOP_K);

        let latency_ms = start.elapsed().as_millis() as u64;
        let record = InteractionRecord {
            timestamp: Some(Utc::now()),
            question: question.to_string(),
            intent: classified.intent.clone(),
            confidence: retrieved.confidence,
            needs_human: verdict.needs_human,
            used_generative_enhancer: enhanced,
            latency_ms,
            channel: origin.channel(),
        };
        if let Err(e) = self.log.append(record).await {
            tracing::error!(error = %e, "failed to append interaction record");
        }

        AskResponse {
            answer,
            intent: classified.intent,
            confidence: retrieved.confidence,
            needs_human: verdict.needs_human,
            citations: retrieved
                .items
                .iter()
                .map(|c| Citation {
                    id: c.id.clone(),
                    title: c.title.clone(),
                    score: c.score,
                })
                .collect(),
            similar_items: similar.items,
            trace: AskTrace {
                path: origin.trace_path().to_string(),
                intent_reason: classified.reason,
                judge_reason: verdict.reason,
                used_generative_enhancer: enhanced,
                latency_ms,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::NO_MATCH_ANSWER;
    use async_trait::async_trait;
    use sd_protocol::{JudgeReason, KnowledgeEntry, RetrievalCandidate};

    fn vpn_knowledge() -> KnowledgeStore {
        KnowledgeStore::fixed(vec![KnowledgeEntry {
            id: "F1".into(),
            title: "VPN setup".into(),
            content: "Connect via client X".into(),
            tags: vec!["vpn".into()],
        }])
    }

    fn pipeline(knowledge: KnowledgeStore, dir: &tempfile::TempDir) -> AskPipeline {
        AskPipeline::new(
            knowledge,
            Arc::new(InteractionLog::new(dir.path().join("logs.json"))),
            None,
        )
    }

    #[tokio::test]
    async fn vpn_question_is_deflected() {
        let dir = tempfile::tempdir().unwrap();
        let p = pipeline(vpn_knowledge(), &dir);

        let response = p.ask("my vpn is broken", AskOrigin::Local).await;
        assert_eq!(response.intent, "network_vpn");
        assert!(response.confidence >= 0.25);
        assert!(!response.needs_human);
        assert_eq!(response.citations[0].id, "F1");
        assert!(!response.trace.used_generative_enhancer);
        assert_eq!(response.trace.path, "local");
    }

    #[tokio::test]
    async fn empty_knowledge_base_escalates() {
        let dir = tempfile::tempdir().unwrap();
        let p = pipeline(KnowledgeStore::fixed(vec![]), &dir);

        let response = p.ask("my vpn is broken", AskOrigin::Local).await;
        assert_eq!(response.confidence, 0.0);
        assert_eq!(response.answer, NO_MATCH_ANSWER);
        assert!(response.needs_human);
        assert_eq!(response.trace.judge_reason, JudgeReason::LowConfidence);
        assert!(response.citations.is_empty());
    }

    #[tokio::test]
    async fn ask_appends_one_log_record() {
        let dir = tempfile::tempdir().unwrap();
        let p = pipeline(vpn_knowledge(), &dir);

        p.ask("my vpn is broken", AskOrigin::Local).await;
        let records = p.log().read_all().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].question, "my vpn is broken");
        assert!(!records[0].used_generative_enhancer);
        assert!(records[0].channel.is_none());
    }

    #[tokio::test]
    async fn provider_origin_marks_channel_and_path() {
        let dir = tempfile::tempdir().unwrap();
        let p = pipeline(vpn_knowledge(), &dir);

        let response = p.ask("my vpn is broken", AskOrigin::Provider).await;
        assert_eq!(response.trace.path, "remote");
        let records = p.log().read_all().await;
        assert_eq!(records[0].channel.as_deref(), Some("tools"));
    }

    #[tokio::test]
    async fn similar_sees_earlier_questions() {
        let dir = tempfile::tempdir().unwrap();
        let p = pipeline(vpn_knowledge(), &dir);

        p.ask("vpn tunnel drops constantly", AskOrigin::Local).await;
        let similar = p.similar("vpn tunnel drops", SIMILAR_TOP_K).await;
        assert!(
            similar
                .items
                .iter()
                .any(|c| c.source == sd_protocol::CandidateSource::History)
        );
    }

    struct FixedEnhancer(&'static str);

    #[async_trait]
    impl AnswerEnhancer for FixedEnhancer {
        async fn enhance(&self, _: &str, _: &str, _: &RetrievalCandidate) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    struct FailingEnhancer;

    #[async_trait]
    impl AnswerEnhancer for FailingEnhancer {
        async fn enhance(&self, _: &str, _: &str, _: &RetrievalCandidate) -> Option<String> {
            None
        }
    }

    #[tokio::test]
    async fn enhancer_replaces_text_but_not_verdict() {
        let dir = tempfile::tempdir().unwrap();
        let p = AskPipeline::new(
            vpn_knowledge(),
            Arc::new(InteractionLog::new(dir.path().join("logs.json"))),
            Some(Arc::new(FixedEnhancer("Short rephrased answer."))),
        );

        let response = p.ask("my vpn is broken", AskOrigin::Local).await;
        assert_eq!(response.answer, "Short rephrased answer.");
        assert!(response.trace.used_generative_enhancer);
        // Deterministic decision unchanged by the rephrasing.
        assert!(!response.needs_human);
        assert!(response.confidence >= 0.25);
    }

    #[tokio::test]
    async fn enhancer_failure_keeps_deterministic_answer() {
        let dir = tempfile::tempdir().unwrap();
        let p = AskPipeline::new(
            vpn_knowledge(),
            Arc::new(InteractionLog::new(dir.path().join("logs.json"))),
            Some(Arc::new(FailingEnhancer)),
        );

        let response = p.ask("my vpn is broken", AskOrigin::Local).await;
        assert!(response.answer.contains("Connect via client X"));
        assert!(!response.trace.used_generative_enhancer);
        let records = p.log().read_all().await;
        assert!(!records[0].used_generative_enhancer);
    }

    #[tokio::test]
    async fn faq_summary_limits() {
        let entries: Vec<KnowledgeEntry> = (0..25)
            .map(|i| KnowledgeEntry {
                id: format!("F{i}"),
                title: format!("entry {i}"),
                content: "x".into(),
                tags: vec![],
            })
            .collect();
        let dir = tempfile::tempdir().unwrap();
        let p = pipeline(KnowledgeStore::fixed(entries), &dir);

        let summary = p.faq_summary().await;
        assert_eq!(summary.count, 25);
        assert_eq!(summary.ids.len(), 20);
        assert_eq!(summary.sample.len(), 2);
    }
}
