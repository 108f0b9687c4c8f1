//! Keyword-based needs assessment.
//!
//! Categories are tested by substring containment on the lower-cased text,
//! so "hurt" also matches inside "hurting". Evaluation order is fixed and
//! defines both the order of the needs list and the urgency override: safety
//! is evaluated last and always forces high urgency.

use crate::models::{Need, NeedsAssessment, Urgency};

/// Confidence when no safety need is found
pub const DEFAULT_CONFIDENCE: f64 = 0.6;
/// Confidence when a safety need is found
pub const SAFETY_CONFIDENCE: f64 = 0.9;

/// Keyword sets in evaluation order
pub const NEED_KEYWORDS: &[(Need, &[&str])] = &[
    (Need::Food, &["hungry", "food", "starving", "hunger"]),
    (Need::Medical, &["sick", "hospital", "hurt", "injured", "medicine"]),
    (Need::Education, &["school", "teacher", "study", "homework"]),
    (Need::Shelter, &["home", "house", "shelter", "camp"]),
    (Need::Safety, &["scared", "threat", "abuse", "afraid", "traffick"]),
];

/// Classify `text` into needs, urgency and confidence.
#[must_use]
pub fn assess_needs(text: &str) -> NeedsAssessment {
    let lowered = text.to_lowercase();
    let mut needs = Vec::new();
    let mut urgency = Urgency::Low;
    let mut confidence = DEFAULT_CONFIDENCE;

    for (need, keywords) in NEED_KEYWORDS {
        if !keywords.iter().any(|keyword| lowered.contains(keyword)) {
            continue;
        }
        needs.push(*need);
        if *need == Need::Safety {
            urgency = Urgency::High;
            confidence = SAFETY_CONFIDENCE;
        }
    }

    if needs.is_empty() {
        needs.push(Need::None);
    }

    NeedsAssessment {
        needs,
        urgency,
        confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_needs() {
        let result = assess_needs("the weather is nice");
        assert_eq!(result.needs, vec![Need::None]);
        assert_eq!(result.urgency, Urgency::Low);
        assert_eq!(result.confidence, DEFAULT_CONFIDENCE);
    }

    #[test]
    fn test_needs_follow_evaluation_order() {
        let result = assess_needs("I am afraid, I have no home and I am hungry");
        assert_eq!(result.needs, vec![Need::Food, Need::Shelter, Need::Safety]);
    }

    #[test]
    fn test_safety_forces_high_urgency() {
        let result = assess_needs("there was a THREAT at school");
        assert_eq!(result.needs, vec![Need::Education, Need::Safety]);
        assert_eq!(result.urgency, Urgency::High);
        assert_eq!(result.confidence, SAFETY_CONFIDENCE);
    }

    #[test]
    fn test_substring_matching() {
        let result = assess_needs("my leg is hurting");
        assert_eq!(result.needs, vec![Need::Medical]);
        assert_eq!(result.urgency, Urgency::Low);
    }

    #[test]
    fn test_each_need_listed_once() {
        let result = assess_needs("food food hungry hunger starving");
        assert_eq!(result.needs, vec![Need::Food]);
    }
}
