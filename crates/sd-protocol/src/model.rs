//! Dataset record types shared between the gateway, the pipeline, and the
//! tool provider.
//!
//! Field names are pinned to the JSON dataset format (`faq.json`,
//! `logs.json`), which is camelCase on disk and on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A curated knowledge-base entry. Owned by an external curator; this core
/// only ever reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub id: String,
    pub title: String,
    pub content: String,
    /// Retrieval tags, matched as substrings of the query. Order is
    /// preserved from the dataset.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// One served question, appended to the interaction log. Never mutated or
/// deleted after the append.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRecord {
    /// May be absent in hand-curated or legacy log files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    pub question: String,
    pub intent: String,
    pub confidence: f64,
    pub needs_human: bool,
    pub used_generative_enhancer: bool,
    pub latency_ms: u64,
    /// Set to "tools" when the record was written by the tool provider;
    /// absent for records written by the local pipeline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

/// Which dataset a retrieval candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    Knowledge,
    History,
}

/// A scored match produced by retrieval or merged search. Ephemeral,
/// computed per query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalCandidate {
    pub source: CandidateSource,
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knowledge_entry_roundtrip() {
        let json = r#"{"id":"F1","title":"VPN setup","content":"Connect via client X","tags":["vpn","remote"]}"#;
        let entry: KnowledgeEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id, "F1");
        assert_eq!(entry.tags, vec!["vpn", "remote"]);

        let back = serde_json::to_string(&entry).unwrap();
        let reparsed: KnowledgeEntry = serde_json::from_str(&back).unwrap();
        assert_eq!(reparsed, entry);
    }

    #[test]
    fn knowledge_entry_tags_default_empty() {
        let json = r#"{"id":"F2","title":"Printer","content":"..."}"#;
        let entry: KnowledgeEntry = serde_json::from_str(json).unwrap();
        assert!(entry.tags.is_empty());
    }

    #[test]
    fn interaction_record_camel_case_fields() {
        let record = InteractionRecord {
            timestamp: Some(Utc::now()),
            question: "vpn down".into(),
            intent: "network_vpn".into(),
            confidence: 0.65,
            needs_human: false,
            used_generative_enhancer: false,
            latency_ms: 12,
            channel: None,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains(r#""needsHuman":false"#));
        assert!(json.contains(r#""usedGenerativeEnhancer":false"#));
        assert!(json.contains(r#""latencyMs":12"#));
        assert!(!json.contains("channel")); // skipped when absent
    }

    #[test]
    fn interaction_record_without_timestamp() {
        let json = r#"{"question":"old entry","intent":"unknown","confidence":0,"needsHuman":true,"usedGenerativeEnhancer":false,"latencyMs":3}"#;
        let record: InteractionRecord = serde_json::from_str(json).unwrap();
        assert!(record.timestamp.is_none());
        assert!(record.channel.is_none());
    }

    #[test]
    fn candidate_source_serialization() {
        assert_eq!(
            serde_json::to_string(&CandidateSource::Knowledge).unwrap(),
            r#""knowledge""#
        );
        assert_eq!(
            serde_json::to_string(&CandidateSource::History).unwrap(),
            r#""history""#
        );
    }

    #[test]
    fn candidate_optional_fields_skipped() {
        let candidate = RetrievalCandidate {
            source: CandidateSource::Knowledge,
            id: "F1".into(),
            title: "VPN setup".into(),
            content: Some("Connect via client X".into()),
            score: 0.65,
            intent: None,
            timestamp: None,
        };
        let json = serde_json::to_string(&candidate).unwrap();
        assert!(json.contains(r#""source":"knowledge""#));
        assert!(!json.contains("intent"));
        assert!(!json.contains("timestamp"));
    }
}
