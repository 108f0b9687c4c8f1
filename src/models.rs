//! Data models for intake processing and case records
//!
//! This module contains all data structures passed between the pipeline
//! stages, the intake request/response shapes, and the stored case record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::IntakeError;

/// Kind of PII removed by the anonymizer.
///
/// Variant order is alphabetical by label so that sorted sets of fields
/// list in label order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedactionField {
    /// `address:` / `location:` line values
    Address,
    /// Email addresses
    Email,
    /// Standalone runs of four or more digits
    IdNumber,
    /// Introduced or dictionary first names
    Name,
    /// Phone numbers
    Phone,
    /// `@handle` mentions
    SocialHandle,
}

impl RedactionField {
    /// Label used in reports and serialized output
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Address => "address",
            Self::Email => "email",
            Self::IdNumber => "id_number",
            Self::Name => "name",
            Self::Phone => "phone",
            Self::SocialHandle => "social_handle",
        }
    }
}

impl fmt::Display for RedactionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Safety block of an intake: redacted text plus raw-text danger flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyResult {
    /// Anonymized, trimmed text
    pub safe_text: String,
    /// True if redaction changed the text
    pub pii_removed: bool,
    /// Danger flags raised from the raw text
    pub safety_flags: Vec<String>,
    /// True if any safety flag was raised
    pub escalation_required: bool,
    /// Kinds of PII removed, in label order
    pub redacted_fields: Vec<RedactionField>,
}

/// Emotion labels known to the lexicon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    /// Nothing detected
    Neutral,
    /// Sadness
    Sadness,
    /// Fear
    Fear,
    /// Anger
    Anger,
    /// Hope
    Hope,
    /// Relief or gratitude
    Relief,
    /// Despair, including self-harm phrases
    Despair,
}

impl Emotion {
    /// Lower-case label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Sadness => "sadness",
            Self::Fear => "fear",
            Self::Anger => "anger",
            Self::Hope => "hope",
            Self::Relief => "relief",
            Self::Despair => "despair",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Intensity bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionCategory {
    /// intensity < 0.35
    Low,
    /// 0.35 <= intensity < 0.8
    Medium,
    /// intensity >= 0.8
    High,
}

impl EmotionCategory {
    /// Bucket a (rounded) intensity value
    #[must_use]
    pub fn from_intensity(intensity: f64) -> Self {
        if intensity >= 0.8 {
            Self::High
        } else if intensity >= 0.35 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Lower-case label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for EmotionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Suggested kind of support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportSuggestion {
    /// Professional counselling
    Counselling,
    /// Peer support group
    PeerSupport,
    /// Encouragement only
    Encouragement,
}

impl SupportSuggestion {
    /// Label used in serialized output
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Counselling => "counselling",
            Self::PeerSupport => "peer_support",
            Self::Encouragement => "encouragement",
        }
    }
}

impl fmt::Display for SupportSuggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Emotion analysis of the safe text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionScore {
    /// Dominant emotion
    pub emotion: Emotion,
    /// `tanh(raw / 3)` rounded to 3 decimals, in [0, 1]
    pub intensity: f64,
    /// Intensity bucket
    pub category: EmotionCategory,
    /// Suggested support
    pub support_suggestion: SupportSuggestion,
    /// Trigger phrases found in the text, in phrase-table order
    pub matched_phrases: Vec<String>,
}

impl EmotionScore {
    /// Result for text with no content at all
    #[must_use]
    pub const fn empty() -> Self {
        Self::neutral(0.0)
    }

    /// Neutral result with the given baseline intensity
    #[must_use]
    pub const fn neutral(intensity: f64) -> Self {
        Self {
            emotion: Emotion::Neutral,
            intensity,
            category: EmotionCategory::Low,
            support_suggestion: SupportSuggestion::Encouragement,
            matched_phrases: Vec::new(),
        }
    }
}

/// Need categories, in detection order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Need {
    /// Food
    Food,
    /// Medical care
    Medical,
    /// Schooling
    Education,
    /// Housing
    Shelter,
    /// Personal safety
    Safety,
    /// No need detected
    None,
}

impl Need {
    /// Lower-case label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Medical => "medical",
            Self::Education => "education",
            Self::Shelter => "shelter",
            Self::Safety => "safety",
            Self::None => "none",
        }
    }
}

impl fmt::Display for Need {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Urgency of the detected needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    /// Default
    Low,
    /// Safety need detected
    High,
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "low",
            Self::High => "high",
        })
    }
}

/// Needs detected in the safe text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeedsAssessment {
    /// Unique needs in detection order, or `[none]`
    pub needs: Vec<Need>,
    /// Urgency
    pub urgency: Urgency,
    /// Confidence in [0, 1]
    pub confidence: f64,
}

impl NeedsAssessment {
    /// True if `need` was detected
    #[must_use]
    pub fn contains(&self, need: Need) -> bool {
        self.needs.contains(&need)
    }
}

/// Escalation level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// score < 0.35
    Low,
    /// 0.35 <= score < 0.7
    Medium,
    /// score >= 0.7 or an absolute trigger fired
    High,
}

impl RiskLevel {
    /// Lower-case label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Follow-up recommended by the risk scorer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecommendedAction {
    /// Absolute trigger fired
    #[serde(rename = "urgent_human_review_assign_counsellor")]
    UrgentHumanReview,
    /// Composite score reached the high level
    #[serde(rename = "assign_to_counsellor (urgent)")]
    AssignCounsellorUrgent,
    /// Medical need
    #[serde(rename = "assign_to_medical_NGO")]
    AssignMedicalNgo,
    /// Education need
    #[serde(rename = "assign_to_education_NGO")]
    AssignEducationNgo,
    /// Shelter need
    #[serde(rename = "assign_to_shelter_NGO")]
    AssignShelterNgo,
    /// Nothing specific
    #[serde(rename = "monitor_or_volunteer_followup")]
    MonitorOrVolunteerFollowup,
}

impl RecommendedAction {
    /// Label used in serialized output
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::UrgentHumanReview => "urgent_human_review_assign_counsellor",
            Self::AssignCounsellorUrgent => "assign_to_counsellor (urgent)",
            Self::AssignMedicalNgo => "assign_to_medical_NGO",
            Self::AssignEducationNgo => "assign_to_education_NGO",
            Self::AssignShelterNgo => "assign_to_shelter_NGO",
            Self::MonitorOrVolunteerFollowup => "monitor_or_volunteer_followup",
        }
    }
}

impl fmt::Display for RecommendedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Escalation decision for one intake
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Score in [0, 1], rounded to 3 decimals
    pub risk_score: f64,
    /// Level derived from the score
    pub risk_level: RiskLevel,
    /// True if the case needs urgent human review
    pub should_escalate: bool,
    /// Recommended follow-up
    pub recommended_action: RecommendedAction,
    /// Audit trace of contributing factors
    pub reason: String,
    /// Trigger phrases the decision was based on
    pub matched_phrases: Vec<String>,
}

/// Narrative output for volunteers and reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuratedOutput {
    /// Short story derived from the safe text
    pub microstory: String,
    /// Prompts for illustrating the story
    pub illustration_prompts: Vec<String>,
}

/// A submitted testimony plus consent metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeRequest {
    /// Caller-supplied case id
    pub id: String,
    /// Raw testimony text
    pub text: String,
    /// Language code
    #[serde(default = "default_lang")]
    pub lang: String,
    /// `text` or `audio`
    #[serde(default = "default_source")]
    pub source: String,
    /// Explicit consent to process
    #[serde(default)]
    pub consent: bool,
    /// `self` or `guardian`
    #[serde(default)]
    pub consent_type: Option<String>,
    /// Whether the raw text may be kept with the case
    #[serde(default)]
    pub store_raw: bool,
}

fn default_lang() -> String {
    "en".to_string()
}

fn default_source() -> String {
    "text".to_string()
}

impl IntakeRequest {
    /// Request with defaults and no consent given
    #[must_use]
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            lang: default_lang(),
            source: default_source(),
            consent: false,
            consent_type: None,
            store_raw: false,
        }
    }

    /// Builder-style helper to record consent
    #[must_use]
    pub fn with_consent(mut self, consent_type: ConsentType) -> Self {
        self.consent = true;
        self.consent_type = Some(consent_type.label().to_string());
        self
    }

    /// Builder-style helper to allow keeping the raw text
    #[must_use]
    pub const fn with_store_raw(mut self, store_raw: bool) -> Self {
        self.store_raw = store_raw;
        self
    }
}

/// Who gave consent for the intake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsentType {
    /// The person themself
    #[serde(rename = "self")]
    SelfConsent,
    /// A parent or guardian
    Guardian,
}

impl ConsentType {
    /// Lower-case label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::SelfConsent => "self",
            Self::Guardian => "guardian",
        }
    }
}

impl FromStr for ConsentType {
    type Err = IntakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "self" => Ok(Self::SelfConsent),
            "guardian" => Ok(Self::Guardian),
            other => Err(IntakeError::InvalidConsentType(Some(other.to_string()))),
        }
    }
}

/// Full result of processing one intake
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeResponse {
    /// Caller-supplied case id
    pub intake_id: String,
    /// Redaction and danger flags
    pub safety: SafetyResult,
    /// Microstory and illustration prompts
    pub curated: CuratedOutput,
    /// Needs assessment
    pub needs: NeedsAssessment,
    /// Emotion analysis
    pub emotion: EmotionScore,
    /// Escalation decision
    pub risk: RiskAssessment,
}

/// Workflow status of a case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    /// Just received
    New,
    /// Assigned to a volunteer or counsellor
    Assigned,
    /// Being worked on
    InProgress,
    /// Closed
    Resolved,
}

impl CaseStatus {
    /// Label used in serialized output
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Assigned => "assigned",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CaseStatus {
    type Err = IntakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new" => Ok(Self::New),
            "assigned" => Ok(Self::Assigned),
            "in_progress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            _ => Err(IntakeError::InvalidStatus(s.to_string())),
        }
    }
}

/// Stored case record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    /// Caller-supplied case id
    pub intake_id: String,
    /// Redaction and danger flags
    pub safety: SafetyResult,
    /// Microstory and illustration prompts
    pub curated: CuratedOutput,
    /// Needs assessment
    pub needs: NeedsAssessment,
    /// Emotion analysis
    pub emotion: EmotionScore,
    /// Escalation decision
    pub risk: RiskAssessment,
    /// Workflow status
    pub status: CaseStatus,
    /// Volunteer or counsellor the case is assigned to
    pub assigned_to: Option<String>,
    /// Consent flag as submitted
    pub consent: bool,
    /// Who consented
    pub consent_type: ConsentType,
    /// When the case was recorded
    pub consent_timestamp: DateTime<Utc>,
    /// Raw text, only kept with `store_raw`
    pub raw_text: Option<String>,
}

impl Case {
    /// Build a new case from a processed intake
    #[must_use]
    pub fn from_response(
        response: IntakeResponse,
        consent_type: ConsentType,
        raw_text: Option<String>,
    ) -> Self {
        Self {
            intake_id: response.intake_id,
            safety: response.safety,
            curated: response.curated,
            needs: response.needs,
            emotion: response.emotion,
            risk: response.risk,
            status: CaseStatus::New,
            assigned_to: None,
            consent: true,
            consent_type,
            consent_timestamp: Utc::now(),
            raw_text,
        }
    }
}

/// Output format for case exports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Comma-separated values format
    Csv,
    /// Plain text report
    Txt,
    /// JSON format
    Json,
}

impl OutputFormat {
    /// Get the file extension for this format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Txt => "txt",
            Self::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = IntakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "txt" => Ok(Self::Txt),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(IntakeError::InvalidConfig(format!(
                "Invalid output format: {other}. Must be one of: txt, csv, json"
            ))),
        }
    }
}
