//! Knowledge retriever — composite lexical scoring over the FAQ dataset.
//!
//! The score is a weighted sum of three independent signals. `tagHits` is
//! deliberately unclamped, so an entry whose tags hit several times can
//! score above 1.0; downstream code must treat the scale as open-ended.

use std::cmp::Ordering;
use std::collections::HashSet;

use sd_protocol::{CandidateSource, KnowledgeEntry, RetrievalCandidate, SimilarResult};

use crate::text::{overlap, token_set, tokenize};

const TAG_WEIGHT: f64 = 0.25;
const TITLE_WEIGHT: f64 = 0.2;
const OVERLAP_WEIGHT: f64 = 0.4;

/// Query text prepared once and scored against many documents.
pub(crate) struct Query {
    pub lowered: String,
    pub tokens: Vec<String>,
}

impl Query {
    pub(crate) fn prepare(text: &str) -> Self {
        Self {
            lowered: text.to_lowercase(),
            tokens: tokenize(text),
        }
    }
}

/// Composite score of one knowledge entry against a prepared query.
pub(crate) fn score_entry(entry: &KnowledgeEntry, query: &Query) -> f64 {
    let tag_hits = entry
        .tags
        .iter()
        .filter(|tag| query.lowered.contains(&tag.to_lowercase()))
        .count();

    let title = entry.title.to_lowercase();
    let title_hit = if !title.is_empty() && query.lowered.contains(&title) {
        1.0
    } else {
        0.0
    };

    let doc: HashSet<String> =
        token_set(&format!("{} {} {}", entry.title, entry.tags.join(" "), entry.content));
    let overlap_score = overlap(&query.tokens, &doc);

    tag_hits as f64 * TAG_WEIGHT + title_hit * TITLE_WEIGHT + overlap_score * OVERLAP_WEIGHT
}

/// Stable descending sort by score; ties keep encounter order.
pub(crate) fn sort_by_score(candidates: &mut [RetrievalCandidate]) {
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
}

/// Round to 3 decimal places, the precision used on the wire.
pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Score every entry against the query, rank, and truncate to `top_k`.
///
/// Confidence is the top-ranked score, or 0 when the dataset is empty.
pub fn search(entries: &[KnowledgeEntry], query_text: &str, top_k: usize) -> SimilarResult {
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

    sort_by_score(&mut items);
    items.truncate(top_k);

    let confidence = items.first().map(|c| c.score).unwrap_or(0.0);
    SimilarResult { items, confidence }
}
