//! Property-based tests for the analysis stages

use proptest::prelude::*;

use hopechain_intake::anonymizer::anonymize;
use hopechain_intake::emotion::{analyze_emotion, EMOTION_PHRASES};
use hopechain_intake::models::{EmotionCategory, EmotionScore, Need, RedactionField, RiskLevel};
use hopechain_intake::needs::assess_needs;
use hopechain_intake::risk::{compute_risk, EXPLICIT_DANGER_TERMS};

/// Single words covering every emotion label plus one miss
const EMOTION_WORDS: &[&str] = &["sad", "scared", "angry", "hope", "grateful", "death", "calm"];

/// Phrases that carry no explicit danger term
const SAFE_PHRASES: [&str; 4] = ["no hope", "give up", "nobody cares", "i can't go on"];

fn need_strategy() -> impl Strategy<Value = Vec<Need>> {
    prop::sample::subsequence(
        vec![Need::Food, Need::Medical, Need::Education, Need::Shelter, Need::Safety],
        0..=5,
    )
}

fn emotion_strategy() -> impl Strategy<Value = EmotionScore> {
    (prop::sample::select(EMOTION_WORDS), 1..5usize)
        .prop_map(|(word, repeat)| analyze_emotion(&vec![word; repeat].join(" ")))
}

proptest! {
    #[test]
    fn prop_emails_are_always_redacted(
        local in "[a-z][a-z0-9]{0,9}",
        domain in "[a-z]{1,10}",
        tld in "[a-z]{2,5}",
        before in "[a-z ]{0,20}",
        after in "[a-z ]{0,20}",
    ) {
        let email = format!("{local}@{domain}.{tld}");
        let result = anonymize(&format!("{before} {email} {after}"));
        prop_assert!(!result.safe_text.contains(&email));
        prop_assert!(!result.safe_text.contains('@'));
        prop_assert!(result.redacted_fields.contains(&RedactionField::Email));
    }

    #[test]
    fn prop_safe_text_is_trimmed(text in "\\PC{0,80}") {
        let result = anonymize(&text);
        prop_assert_eq!(result.safe_text.trim(), result.safe_text.as_str());
    }

    #[test]
    fn prop_intensity_is_bounded_and_bucketed(text in "\\PC{0,200}") {
        let result = analyze_emotion(&text);
        prop_assert!((0.0..=1.0).contains(&result.intensity));
        prop_assert_eq!(result.category, EmotionCategory::from_intensity(result.intensity));
    }

    #[test]
    fn prop_needs_assessment_is_idempotent(text in "\\PC{0,120}") {
        prop_assert_eq!(assess_needs(&text), assess_needs(&text));
    }

    #[test]
    fn prop_needs_are_unique_and_never_mixed_with_none(text in "[a-z ]{0,120}") {
        let result = assess_needs(&text);
        let mut deduped = result.needs.clone();
        deduped.dedup();
        prop_assert_eq!(&deduped, &result.needs);
        if result.needs.contains(&Need::None) {
            prop_assert_eq!(result.needs.len(), 1);
        }
    }

    #[test]
    fn prop_risk_is_monotonic_in_phrase_count(
        emotion in emotion_strategy(),
        needs in need_strategy(),
        count in 0..SAFE_PHRASES.len(),
    ) {
        let fewer: Vec<String> = SAFE_PHRASES[..count].iter().map(ToString::to_string).collect();
        let more: Vec<String> = SAFE_PHRASES[..=count].iter().map(ToString::to_string).collect();

        let low = compute_risk(&emotion, &[], &fewer, &needs);
        let high = compute_risk(&emotion, &[], &more, &needs);
        prop_assert!(high.risk_score >= low.risk_score);
        prop_assert!(high.risk_level >= low.risk_level);
    }

    #[test]
    fn prop_explicit_danger_always_escalates(
        emotion in emotion_strategy(),
        needs in need_strategy(),
        term in prop::sample::select(EXPLICIT_DANGER_TERMS),
        prefix in "[a-z ]{0,10}",
    ) {
        let phrases = vec![format!("{prefix}{term}")];
        let result = compute_risk(&emotion, &[], &phrases, &needs);
        prop_assert_eq!(result.risk_score, 1.0);
        prop_assert_eq!(result.risk_level, RiskLevel::High);
        prop_assert!(result.should_escalate);
    }

    #[test]
    fn prop_score_stays_in_unit_interval(
        emotion in emotion_strategy(),
        needs in need_strategy(),
        count in 0..=SAFE_PHRASES.len(),
    ) {
        let phrases: Vec<String> = SAFE_PHRASES[..count].iter().map(ToString::to_string).collect();
        let result = compute_risk(&emotion, &[], &phrases, &needs);
        prop_assert!((0.0..=1.0).contains(&result.risk_score));
        prop_assert_eq!(result.should_escalate, result.risk_level == RiskLevel::High);
    }
}

#[test]
fn safe_phrases_are_trigger_phrases() {
    for phrase in SAFE_PHRASES {
        assert!(EMOTION_PHRASES.contains(&phrase));
    }
}
