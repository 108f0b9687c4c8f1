//! HopeChain Intake - testimony anonymization and escalation scoring
//!
//! A Rust library that takes free-text testimonies from vulnerable people,
//! strips personal information, and produces an auditable case record.
//!
//! # Features
//!
//! - Regex and dictionary based PII redaction
//! - Keyword needs assessment and lexicon emotion scoring
//! - Two-tier escalation risk scoring
//! - Microstory generation with an extractive fallback
//! - Case store (in-memory or sled) with a small workflow
//! - Case reports as TXT, CSV or JSON

/// PII redaction
pub mod anonymizer;
/// Configuration management
pub mod config;
/// Emotion analysis
pub mod emotion;
/// Error types
pub mod error;
/// Case report export
pub mod file_writer;
/// Logging setup and utilities
pub mod logging;
/// Metrics collection
pub mod metrics;
/// Microstory generation
pub mod microstory;
/// Data models and structures
pub mod models;
/// Needs assessment
pub mod needs;
/// Analysis pipeline
pub mod pipeline;
/// Text case reports
pub mod report;
/// Case storage
pub mod repository;
/// Risk scoring
pub mod risk;
/// Raw-text danger flags
pub mod safety;
/// Intake orchestration
pub mod service;
/// Numeric and text helpers
pub mod utils;
/// Input validation
pub mod validation;

// Re-export key components for easier access
pub use anonymizer::{anonymize, Anonymized};
pub use config::AppConfig;
pub use emotion::analyze_emotion;
pub use error::{IntakeError, Result};
pub use microstory::{extractive_microstory, MicrostoryGenerator, TextRewriter};
pub use models::{
    Case, CaseStatus, ConsentType, EmotionScore, IntakeRequest, IntakeResponse, NeedsAssessment,
    OutputFormat, RiskAssessment,
};
pub use needs::assess_needs;
pub use pipeline::{analyze_text, Analysis};
pub use repository::{CaseRepository, InMemoryCaseStore, SledCaseStore};
pub use risk::compute_risk;
pub use service::IntakeService;
