//! Lexical normalizer — the foundation for all scoring.
//!
//! Tokenization is deterministic and total: any input, including the empty
//! string, yields a (possibly empty) token sequence and never fails.

use std::collections::HashSet;

/// Split free text into lowercase word/number tokens.
///
/// Every character that is not a Unicode letter, digit, or whitespace is
/// replaced by a space before splitting, so punctuation never glues words
/// together ("VPN-Zugang?" → ["vpn", "zugang"]).
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Token set of a document, for overlap lookups.
pub fn token_set(text: &str) -> HashSet<String> {
    tokenize(text).into_iter().collect()
}

/// Fraction of query tokens present in the document token set.
///
/// In [0, 1] for any non-empty query; exactly 0 when the query has no
/// tokens. Duplicate query tokens are counted individually.
pub fn overlap(query_tokens: &[String], doc: &HashSet<String>) -> f64 {
    if query_tokens.is_empty() {
        return 0.0;
    }
    let hits = query_tokens.iter().filter(|t| doc.contains(*t)).count();
    hits as f64 / query_tokens.len() as f64
}
