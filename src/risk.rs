//! Escalation risk scoring.
//!
//! Two tiers. Absolute triggers short-circuit to a fixed high score: an
//! explicit danger term inside the matched phrases first, then any external
//! safety flag. Otherwise a weighted composite of emotion, intensity, phrase
//! count and needs is clamped to [0, 1] and bucketed.

use crate::models::{Emotion, EmotionScore, Need, RecommendedAction, RiskAssessment, RiskLevel};
use crate::utils::round3;

/// Terms that force escalation when found in the matched phrases
pub const EXPLICIT_DANGER_TERMS: &[&str] = &[
    "suicide",
    "kill myself",
    "end my life",
    "rape",
    "traffick",
    "sell me",
    "hurt me badly",
];

/// Score for an explicit danger term
pub const EXPLICIT_DANGER_SCORE: f64 = 1.0;
/// Score for an external safety flag
pub const SAFETY_FLAG_SCORE: f64 = 0.95;
/// Multiplier applied to emotion intensity
pub const INTENSITY_WEIGHT: f64 = 0.55;
/// Added per matched phrase
pub const PHRASE_WEIGHT: f64 = 0.25;
/// Added when a safety need was detected
pub const SAFETY_NEED_WEIGHT: f64 = 0.25;
/// Added when a medical need was detected
pub const MEDICAL_NEED_WEIGHT: f64 = 0.15;
/// Lower bound of the high level
pub const HIGH_THRESHOLD: f64 = 0.7;
/// Lower bound of the medium level
pub const MEDIUM_THRESHOLD: f64 = 0.35;

/// Reason recorded for an explicit danger term
pub const REASON_EXPLICIT_DANGER: &str = "explicit_immediate_danger";
/// Reason recorded for an external safety flag
pub const REASON_SAFETY_FLAG: &str = "safety_flag_triggered";

/// Base weight contributed by the dominant emotion
#[must_use]
pub const fn emotion_weight(emotion: Emotion) -> Option<f64> {
    match emotion {
        Emotion::Despair => Some(0.65),
        Emotion::Fear => Some(0.45),
        Emotion::Sadness => Some(0.25),
        Emotion::Anger => Some(0.20),
        Emotion::Neutral | Emotion::Hope | Emotion::Relief => None,
    }
}

/// Level for a clamped composite score
#[must_use]
pub fn level_for(score: f64) -> RiskLevel {
    if score >= HIGH_THRESHOLD {
        RiskLevel::High
    } else if score >= MEDIUM_THRESHOLD {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Combine emotion, safety flags, matched phrases and needs into an
/// escalation decision.
#[must_use]
pub fn compute_risk(
    emotion: &EmotionScore,
    safety_flags: &[String],
    matched_phrases: &[String],
    needs: &[Need],
) -> RiskAssessment {
    if contains_explicit_danger(matched_phrases) {
        return absolute(EXPLICIT_DANGER_SCORE, REASON_EXPLICIT_DANGER, matched_phrases);
    }
    if safety_flags.iter().any(|flag| !flag.is_empty()) {
        return absolute(SAFETY_FLAG_SCORE, REASON_SAFETY_FLAG, matched_phrases);
    }

    let mut risk = 0.0;
    let mut reasons = Vec::new();

    if let Some(weight) = emotion_weight(emotion.emotion) {
        risk += weight;
        reasons.push(format!("emotion={}", emotion.emotion));
    }

    risk += emotion.intensity * INTENSITY_WEIGHT;

    #[allow(clippy::cast_precision_loss)]
    let phrase_count = matched_phrases.len() as f64;
    risk += phrase_count * PHRASE_WEIGHT;

    if needs.contains(&Need::Safety) {
        risk += SAFETY_NEED_WEIGHT;
        reasons.push("need=safety".to_string());
    }
    if needs.contains(&Need::Medical) {
        risk += MEDICAL_NEED_WEIGHT;
        reasons.push("need=medical".to_string());
    }

    let risk = risk.clamp(0.0, 1.0);
    let risk_level = level_for(risk);

    RiskAssessment {
        risk_score: round3(risk),
        risk_level,
        should_escalate: risk_level == RiskLevel::High,
        recommended_action: action_for(risk_level, needs),
        reason: reasons.join(";"),
        matched_phrases: matched_phrases.to_vec(),
    }
}

/// True if any explicit danger term occurs in the matched phrases
#[must_use]
pub fn contains_explicit_danger(matched_phrases: &[String]) -> bool {
    let joined = matched_phrases.join(" ").to_lowercase();
    EXPLICIT_DANGER_TERMS.iter().any(|term| joined.contains(term))
}

fn action_for(level: RiskLevel, needs: &[Need]) -> RecommendedAction {
    if level == RiskLevel::High {
        RecommendedAction::AssignCounsellorUrgent
    } else if needs.contains(&Need::Medical) {
        RecommendedAction::AssignMedicalNgo
    } else if needs.contains(&Need::Education) {
        RecommendedAction::AssignEducationNgo
    } else if needs.contains(&Need::Shelter) {
        RecommendedAction::AssignShelterNgo
    } else {
        RecommendedAction::MonitorOrVolunteerFollowup
    }
}

fn absolute(score: f64, reason: &str, matched_phrases: &[String]) -> RiskAssessment {
    RiskAssessment {
        risk_score: score,
        risk_level: RiskLevel::High,
        should_escalate: true,
        recommended_action: RecommendedAction::UrgentHumanReview,
        reason: reason.to_string(),
        matched_phrases: matched_phrases.to_vec(),
    }
}
