//! Lexicon and phrase based emotion scoring.
//!
//! Two sources feed one score table: trigger phrases (substring match on
//! the lower-cased text, 1.8 each towards despair) and single-token lexicon
//! weights. The dominant emotion is the strictly highest score; ties go to
//! the label that entered the table first. Phrases are scored before tokens,
//! and tokens in text order, so despair from a phrase beats any token-only
//! label on a tie, and between token-only labels the one whose word appears
//! first in the text wins.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::models::{Emotion, EmotionCategory, EmotionScore, SupportSuggestion};
use crate::utils::round3;

/// Score added to despair per matched trigger phrase
pub const PHRASE_WEIGHT: f64 = 1.8;
/// Intensity reported when text has content but nothing matched
pub const BASELINE_INTENSITY: f64 = 0.15;

/// Multi-word trigger phrases, checked in this order
pub const EMOTION_PHRASES: &[&str] = &[
    "i want to die",
    "kill myself",
    "end my life",
    "i can't go on",
    "no hope",
    "give up",
    "nobody cares",
];

/// Single-token lexicon: token, emotion, weight
pub const EMOTION_LEXICON: &[(&str, Emotion, f64)] = &[
    ("sad", Emotion::Sadness, 1.0),
    ("sadness", Emotion::Sadness, 1.0),
    ("lonely", Emotion::Sadness, 1.0),
    ("miss", Emotion::Sadness, 0.6),
    ("cry", Emotion::Sadness, 0.9),
    ("tears", Emotion::Sadness, 0.9),
    ("alone", Emotion::Sadness, 1.0),
    ("hurt", Emotion::Sadness, 0.8),
    ("scared", Emotion::Fear, 1.0),
    ("afraid", Emotion::Fear, 1.0),
    ("frightened", Emotion::Fear, 1.0),
    ("danger", Emotion::Fear, 1.0),
    ("unsafe", Emotion::Fear, 0.9),
    ("angry", Emotion::Anger, 1.0),
    ("mad", Emotion::Anger, 0.9),
    ("upset", Emotion::Anger, 0.6),
    ("hope", Emotion::Hope, 1.0),
    ("dream", Emotion::Hope, 0.8),
    ("thank", Emotion::Relief, 0.7),
    ("grateful", Emotion::Relief, 0.9),
    ("safe", Emotion::Relief, 0.8),
    ("suicide", Emotion::Despair, 1.5),
    ("kill", Emotion::Despair, 1.2),
    ("death", Emotion::Despair, 1.0),
    ("hopeless", Emotion::Despair, 1.0),
];

static LEXICON: LazyLock<HashMap<&'static str, (Emotion, f64)>> = LazyLock::new(|| {
    EMOTION_LEXICON
        .iter()
        .map(|(token, emotion, weight)| (*token, (*emotion, *weight)))
        .collect()
});

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[\w']+\b").expect("Invalid regex: token pattern"));

/// Score table that remembers first-insertion order
#[derive(Debug, Default)]
struct ScoreTable {
    entries: Vec<(Emotion, f64)>,
}

impl ScoreTable {
    fn add(&mut self, emotion: Emotion, weight: f64) {
        if let Some(entry) = self.entries.iter_mut().find(|(e, _)| *e == emotion) {
            entry.1 += weight;
        } else {
            self.entries.push((emotion, weight));
        }
    }

    /// Strict maximum, earliest entry wins ties
    fn dominant(&self) -> Option<(Emotion, f64)> {
        let mut best: Option<(Emotion, f64)> = None;
        for &(emotion, score) in &self.entries {
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((emotion, score)),
            }
        }
        best
    }
}

/// Lower-cased word tokens (letters, digits, underscore and apostrophes)
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// `tanh(raw / 3)` rounded to 3 decimals
#[must_use]
pub fn intensity_from_raw(raw: f64) -> f64 {
    round3((raw / 3.0).tanh())
}

/// Support suggestion for a dominant emotion and its category
#[must_use]
pub fn support_for(emotion: Emotion, category: EmotionCategory) -> SupportSuggestion {
    if matches!(emotion, Emotion::Fear | Emotion::Despair) || category == EmotionCategory::High {
        SupportSuggestion::Counselling
    } else if emotion == Emotion::Sadness && category != EmotionCategory::Low {
        SupportSuggestion::Counselling
    } else if emotion == Emotion::Relief {
        SupportSuggestion::PeerSupport
    } else {
        SupportSuggestion::Encouragement
    }
}

/// Score the emotional tone of `text`.
#[must_use]
pub fn analyze_emotion(text: &str) -> EmotionScore {
    if text.trim().is_empty() {
        return EmotionScore::empty();
    }

    let lowered = text.to_lowercase();
    let mut table = ScoreTable::default();
    let mut matched_phrases = Vec::new();

    for phrase in EMOTION_PHRASES {
        if lowered.contains(phrase) {
            matched_phrases.push((*phrase).to_string());
            table.add(Emotion::Despair, PHRASE_WEIGHT);
        }
    }

    for token in TOKEN_RE.find_iter(&lowered) {
        if let Some(&(emotion, weight)) = LEXICON.get(token.as_str()) {
            table.add(emotion, weight);
        }
    }

    let Some((emotion, raw)) = table.dominant() else {
        return EmotionScore::neutral(BASELINE_INTENSITY);
    };

    score_from_raw(emotion, raw, matched_phrases)
}

fn score_from_raw(emotion: Emotion, raw: f64, matched_phrases: Vec<String>) -> EmotionScore {
    let intensity = intensity_from_raw(raw);
    let category = EmotionCategory::from_intensity(intensity);

    EmotionScore {
        emotion,
        intensity,
        category,
        support_suggestion: support_for(emotion, category),
        matched_phrases,
    }
}
