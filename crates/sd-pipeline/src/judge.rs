//! Escalation judge — pure decision function for human handoff.
//!
//! Rules are evaluated in strict precedence order and exactly one reason
//! is reported. The order is part of the contract: a low-confidence
//! unknown-intent interaction reports `low_confidence`, never
//! `unknown_intent`.

use sd_protocol::{JudgeReason, Verdict};

use crate::intent::UNKNOWN;

/// Below this confidence the interaction always goes to a human.
pub const CONFIDENCE_FLOOR: f64 = 0.25;

/// Phrases (lowercase) whose presence in an answer suggests escalation.
/// Bilingual: "escalate" / "responsible party" families.
const ESCALATION_PHRASES: &[&str] = &[
    "escalate",
    "escalation",
    "eskalier",
    "eskalation",
    "responsible team",
    "responsible party",
    "zuständig",
    "verantwortlich",
];

/// Decide whether an interaction needs a human.
pub fn judge(confidence: f64, intent: &str, answer: &str) -> Verdict {
    if confidence < CONFIDENCE_FLOOR {
        return Verdict {
            needs_human: true,
            reason: JudgeReason::LowConfidence,
        };
    }
    if intent == UNKNOWN {
        return Verdict {
            needs_human: true,
            reason: JudgeReason::UnknownIntent,
        };
    }
    let lowered = answer.to_lowercase();
    if ESCALATION_PHRASES.iter().any(|p| lowered.contains(p)) {
        return Verdict {
            needs_human: true,
            reason: JudgeReason::AnswerSuggestsEscalation,
        };
    }
    Verdict {
        needs_human: false,
        reason: JudgeReason::Ok,
    }
}
