//! Metrics aggregator — deflection rate, confidence stats, intent
//! histogram over the full interaction log.

use std::collections::BTreeMap;

use sd_protocol::{InteractionRecord, MetricsReport};

use crate::retrieve::round3;

/// Compute aggregate metrics. All ratio/average fields are 0 on an empty
/// store (no division by zero) and rounded to 3 decimal places.
pub fn aggregate(records: &[InteractionRecord]) -> MetricsReport {
    let total = records.len() as u64;
    let deflected = records.iter().filter(|r| !r.needs_human).count() as u64;

    let (deflection_rate, avg_confidence, max_confidence) = if records.is_empty() {
        (0.0, 0.0, 0.0)
    } else {
        let sum: f64 = records.iter().map(|r| r.confidence).sum();
        let max = records
            .iter()
            .map(|r| r.confidence)
            .fold(f64::MIN, f64::max);
        (
            round3(deflected as f64 / total as f64),
            round3(sum / total as f64),
            round3(max),
        )
    };

    let mut by_intent: BTreeMap<String, u64> = BTreeMap::new();
    for record in records {
        *by_intent.entry(record.intent.clone()).or_default() += 1;
    }

    MetricsReport {
        total,
        deflected,
        deflection_rate,
        avg_confidence,
        max_confidence,
        by_intent,
    }
}
