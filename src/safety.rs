//! Danger flags raised from the raw text and assembly of the safety block.

use crate::anonymizer::Anonymized;
use crate::models::SafetyResult;

/// Flag raised when the raw text mentions immediate danger
pub const POSSIBLE_IMMEDIATE_DANGER: &str = "possible_immediate_danger";

/// Raw-text keywords that raise [`POSSIBLE_IMMEDIATE_DANGER`]
pub const DANGER_KEYWORDS: &[&str] = &["suicide", "self harm", "kill myself", "traffick", "rape"];

/// Scan the raw (pre-redaction) text for danger keywords.
///
/// Runs on the raw text because redaction may split or remove the words
/// around a keyword.
#[must_use]
pub fn detect_safety_flags(raw_text: &str) -> Vec<String> {
    let lowered = raw_text.to_lowercase();
    if DANGER_KEYWORDS.iter().any(|keyword| lowered.contains(keyword)) {
        vec![POSSIBLE_IMMEDIATE_DANGER.to_string()]
    } else {
        Vec::new()
    }
}

/// Build the safety block from an anonymization result and raw-text flags
#[must_use]
pub fn build_safety_result(anonymized: &Anonymized, safety_flags: Vec<String>) -> SafetyResult {
    SafetyResult {
        safe_text: anonymized.safe_text.clone(),
        pii_removed: anonymized.changed,
        escalation_required: !safety_flags.is_empty(),
        safety_flags,
        redacted_fields: anonymized.fields(),
    }
}
