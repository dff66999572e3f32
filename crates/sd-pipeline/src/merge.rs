//! Cross-source merger — ranked merge of knowledge entries and historical
//! queries.
//!
//! Knowledge entries use the full composite formula from `retrieve`;
//! history records are scored by token overlap against their stored
//! question only (they have no tags or title to match).

use sd_protocol::{
    CandidateSource, InteractionRecord, KnowledgeEntry, RetrievalCandidate, SimilarResult,
};

use crate::retrieve::{Query, round3, score_entry, sort_by_score};
use crate::text::{overlap, token_set};

/// History titles are a preview of the original question.
const HISTORY_TITLE_CHARS: usize = 80;

fn history_title(question: &str) -> String {
    if question.chars().count() <= HISTORY_TITLE_CHARS {
        question.to_string()
    } else {
        let truncated: String = question.chars().take(HISTORY_TITLE_CHARS).collect();
        format!("{truncated}...")
    }
}

fn history_id(record: &InteractionRecord, index: usize) -> String {
    match record.timestamp {
        Some(ts) => ts.to_rfc3339(),
        None => format!("log-{index}"),
    }
}

/// Merge scored knowledge and history candidates into one ranked sequence.
///
/// Non-positive scores are discarded, the rest sorted descending (stable),
/// truncated to `top_k`, and rounded to 3 decimals. Confidence is the top
/// rounded score, or 0 when nothing survives the filter.
pub fn merged_search(
    entries: &[KnowledgeEntry],
    records: &[InteractionRecord],
    query_text: &str,
    top_k: usize,
) -> SimilarResult {
    let query = Query::prepare(query_text);

    let mut items: Vec<RetrievalCandidate> = entries
        .iter()
        .map(|entry| RetrievalCandidate {
            source: CandidateSource::Knowledge,
            id: entry.id.clone(),
            title: entry.title.clone(),
            content: Some(entry.content.clone()),
            score: score_entry(entry, &query),
            intent: None,
            timestamp: None,
        })
        .collect();

    items.extend(records.iter().enumerate().map(|(i, record)| {
        let doc = token_set(&record.question);
        RetrievalCandidate {
            source: CandidateSource::History,
            id: history_id(record, i),
            title: history_title(&record.question),
            content: None,
            score: overlap(&query.tokens, &doc),
            intent: Some(record.intent.clone()),
            timestamp: record.timestamp,
        }
    }));

    items.retain(|c| c.score > 0.0);
    sort_by_score(&mut items);
    items.truncate(top_k);
    for item in &mut items {
        item.score = round3(item.score);
    }

    let confidence = items.first().map(|c| c.score).unwrap_or(0.0);
    SimilarResult { items, confidence }
}
