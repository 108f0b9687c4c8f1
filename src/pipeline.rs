//! The synchronous analysis core: anonymize, then assess needs and emotion on
//! the safe text, then score risk. No I/O and no configuration.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::anonymizer::anonymize;
use crate::emotion::analyze_emotion;
use crate::error::{IntakeError, Result};
use crate::models::{EmotionScore, NeedsAssessment, RiskAssessment, SafetyResult};
use crate::needs::assess_needs;
use crate::risk::compute_risk;
use crate::safety::{build_safety_result, detect_safety_flags};

/// Output of the four analysis stages for one text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Redaction result and raw-text danger flags
    pub safety: SafetyResult,
    /// Needs detected in the safe text
    pub needs: NeedsAssessment,
    /// Emotion detected in the safe text
    pub emotion: EmotionScore,
    /// Escalation decision
    pub risk: RiskAssessment,
}

/// Run the analysis pipeline on raw text.
///
/// Whitespace-only text is rejected before any stage runs. Danger flags are
/// taken from the raw text; every other stage sees only the safe text.
pub fn analyze_text(raw_text: &str) -> Result<Analysis> {
    if raw_text.trim().is_empty() {
        return Err(IntakeError::EmptyText);
    }

    let anonymized = anonymize(raw_text);
    let safety = build_safety_result(&anonymized, detect_safety_flags(raw_text));

    let needs = assess_needs(&safety.safe_text);
    let emotion = analyze_emotion(&safety.safe_text);
    let risk = compute_risk(
        &emotion,
        &safety.safety_flags,
        &emotion.matched_phrases,
        &needs.needs,
    );

    debug!(
        redacted = ?safety.redacted_fields,
        emotion = %emotion.emotion,
        risk_level = %risk.risk_level,
        "Analysis complete"
    );

    Ok(Analysis {
        safety,
        needs,
        emotion,
        risk,
    })
}
