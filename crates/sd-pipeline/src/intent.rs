//! Intent classifier — ordered keyword-pattern rules.
//!
//! An explicit table of `{intent, pattern, reason}` entries evaluated
//! top-down; the first matching rule wins and only one category is ever
//! returned. The keyword families are bilingual (English/German) because
//! the knowledge base and incoming questions are.

use std::sync::LazyLock;

use regex::Regex;

use sd_protocol::IntentResult;

pub const ACCOUNT_ACCESS: &str = "account_access";
pub const NETWORK_VPN: &str = "network_vpn";
pub const PROCUREMENT: &str = "procurement";
pub const EMAIL_ISSUE: &str = "email_issue";
pub const UNKNOWN: &str = "unknown";

/// One classification rule. Rule order in [`RULES`] is significant.
struct IntentRule {
    intent: &'static str,
    pattern: Regex,
    reason: &'static str,
}

static RULES: LazyLock<Vec<IntentRule>> = LazyLock::new(|| {
    let rule = |intent, pattern: &str, reason| IntentRule {
        intent,
        pattern: Regex::new(pattern).expect("intent rule pattern must compile"),
        reason,
    };
    vec![
        rule(
            ACCOUNT_ACCESS,
            r"(?i)passwor[dt]|account|konto|login|anmeld|locked|gesperrt|entsperr|zugangsdaten|reset",
            "matched account/password keywords",
        ),
        rule(
            NETWORK_VPN,
            r"(?i)vpn|network|netzwerk|verbindung|connect|wlan|wi-?fi|internet|tunnel",
            "matched VPN/connectivity keywords",
        ),
        rule(
            PROCUREMENT,
            r"(?i)bestell|beschaffung|procure|order|einkauf|purchase|laptop|hardware",
            "matched procurement keywords",
        ),
        rule(
            EMAIL_ISSUE,
            r"(?i)e-?mail|outlook|postfach|mailbox|webmail|smtp|imap",
            "matched email keywords",
        ),
    ]
});

/// Classify a message into exactly one intent category.
pub fn classify(text: &str) -> IntentResult {
    for rule in RULES.iter() {
        if rule.pattern.is_match(text) {
            return IntentResult {
                intent: rule.intent.to_string(),
                reason: rule.reason.to_string(),
            };
        }
    }
    IntentResult {
        intent: UNKNOWN.to_string(),
        reason: "no strong keywords".to_string(),
    }
}
