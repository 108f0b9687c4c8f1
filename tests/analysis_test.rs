//! Tests for the individual analysis stages and the composed pipeline

use hopechain_intake::anonymizer::{anonymize, is_common_first_name};
use hopechain_intake::emotion::analyze_emotion;
use hopechain_intake::error::IntakeError;
use hopechain_intake::models::{
    Emotion, EmotionCategory, EmotionScore, Need, RecommendedAction, RedactionField, RiskLevel,
    SupportSuggestion, Urgency,
};
use hopechain_intake::needs::assess_needs;
use hopechain_intake::pipeline::analyze_text;
use hopechain_intake::risk::compute_risk;

#[test]
fn test_anonymize_every_field_kind() {
    let text = "I'm Maria. Email me at maria.k+1@mail.example.org or ping @maria_k.\n\
                Location: Block 7, Kakuma\nMy card number is 48213.";
    let result = anonymize(text);

    assert!(result.changed);
    assert!(!result.safe_text.contains("maria.k+1@mail.example.org"));
    assert!(!result.safe_text.contains("48213"));
    assert!(!result.safe_text.contains("Kakuma"));
    assert!(result.safe_text.contains("Location: [REDACTED]"));
    assert!(result.safe_text.contains("[REDACTED_HANDLE]"));
    assert!(result.safe_text.starts_with("I'm [REDACTED_NAME]."));
    assert_eq!(
        result.fields(),
        vec![
            RedactionField::Address,
            RedactionField::Email,
            RedactionField::IdNumber,
            RedactionField::Name,
            RedactionField::SocialHandle,
        ]
    );
}

#[test]
fn test_anonymize_over_redacts_years() {
    let result = anonymize("we left in 2019");
    assert_eq!(result.safe_text, "we left in [REDACTED]");
    assert_eq!(result.fields(), vec![RedactionField::IdNumber]);
}

#[test]
fn test_anonymize_keeps_lowercase_after_introduction() {
    let result = anonymize("I am scared");
    assert_eq!(result.safe_text, "I am scared");
    assert!(!result.changed);
    assert!(result.fields().is_empty());
}

#[test]
fn test_anonymize_trims_without_marking_change() {
    let result = anonymize("  nothing personal here \n");
    assert_eq!(result.safe_text, "nothing personal here");
    assert!(!result.changed);
}

#[test]
fn test_common_name_lookup_ignores_case() {
    assert!(is_common_first_name("Sam"));
    assert!(is_common_first_name("SAM"));
    assert!(!is_common_first_name("River"));
}

#[test]
fn test_needs_in_fixed_order() {
    let result = assess_needs("I was afraid at the camp, hungry, and cannot go to school");
    assert_eq!(
        result.needs,
        vec![Need::Food, Need::Education, Need::Shelter, Need::Safety]
    );
    assert_eq!(result.urgency, Urgency::High);
    assert_eq!(result.confidence, 0.9);
}

#[test]
fn test_needs_substring_matching() {
    // "hurting" contains "hurt", "homework" contains "home"
    let result = assess_needs("my arm is hurting and I lost my homework");
    assert_eq!(result.needs, vec![Need::Medical, Need::Education, Need::Shelter]);
    assert_eq!(result.urgency, Urgency::Low);
    assert_eq!(result.confidence, 0.6);
}

#[test]
fn test_needs_none() {
    let result = assess_needs("the sky is blue");
    assert_eq!(result.needs, vec![Need::None]);
    assert_eq!(result.urgency, Urgency::Low);
}

#[test]
fn test_emotion_whitespace_only() {
    assert_eq!(analyze_emotion(" \t "), EmotionScore::empty());
}

#[test]
fn test_emotion_sadness_medium_is_counselling() {
    let result = analyze_emotion("I am sad and lonely and I cry");
    // 1.0 + 1.0 + 0.9
    assert_eq!(result.emotion, Emotion::Sadness);
    assert_eq!(result.intensity, 0.747);
    assert_eq!(result.category, EmotionCategory::Medium);
    assert_eq!(result.support_suggestion, SupportSuggestion::Counselling);
}

#[test]
fn test_emotion_hope_is_encouragement() {
    let result = analyze_emotion("I hope to dream again");
    assert_eq!(result.emotion, Emotion::Hope);
    assert_eq!(result.category, EmotionCategory::Medium);
    assert_eq!(result.support_suggestion, SupportSuggestion::Encouragement);
}

#[test]
fn test_emotion_punctuation_does_not_hide_tokens() {
    let result = analyze_emotion("Scared!!! so SCARED...");
    assert_eq!(result.emotion, Emotion::Fear);
    assert_eq!(result.intensity, 0.583);
}

#[test]
fn test_risk_ignores_flags_when_phrase_is_explicit() {
    let emotion = analyze_emotion("I want to end my life");
    let flags = vec!["possible_immediate_danger".to_string()];
    let result = compute_risk(&emotion, &flags, &emotion.matched_phrases, &[Need::None]);
    assert_eq!(result.risk_score, 1.0);
    assert_eq!(result.reason, "explicit_immediate_danger");
}

#[test]
fn test_risk_phrases_add_weight() {
    let emotion = analyze_emotion("no hope, I give up");
    assert_eq!(emotion.matched_phrases, vec!["no hope", "give up"]);
    let result = compute_risk(&emotion, &[], &emotion.matched_phrases, &[Need::None]);
    assert_eq!(result.risk_score, 1.0);
    assert_eq!(result.risk_level, RiskLevel::High);
    assert_eq!(result.recommended_action, RecommendedAction::AssignCounsellorUrgent);
    assert_eq!(result.reason, "emotion=despair");
}

#[test]
fn test_pipeline_rejects_empty_text() {
    assert!(matches!(analyze_text(""), Err(IntakeError::EmptyText)));
}

#[test]
fn test_pipeline_uses_safe_text_for_needs() {
    // The address value would otherwise match the shelter keyword "camp"
    let analysis = analyze_text("address: Camp 4, Block B").expect("analysis");
    assert_eq!(analysis.safety.safe_text, "address: [REDACTED]");
    assert_eq!(analysis.needs.needs, vec![Need::None]);
}
