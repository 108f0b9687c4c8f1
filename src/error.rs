//! Error types for the hopechain-intake library.
//!
//! Analysis stages are total over non-empty text and never fail; the variants
//! below cover intake validation, the case store, report export and
//! configuration.

use thiserror::Error;

/// Errors that can occur while processing intakes and managing cases.
#[derive(Error, Debug)]
pub enum IntakeError {
    /// Submitted text is empty or whitespace-only
    #[error("Text content is empty")]
    EmptyText,

    /// Consent flag was not set on the intake
    #[error("Consent is required before intake can be processed")]
    ConsentRequired,

    /// Consent type is missing or not one of the accepted values
    #[error("consent_type must be 'self' or 'guardian', got {0:?}")]
    InvalidConsentType(Option<String>),

    /// Submitted text exceeds the configured maximum length
    #[error("Text too long: {len} characters (max {max})")]
    TextTooLong {
        /// Length of the submitted text in characters
        len: usize,
        /// Configured maximum
        max: usize,
    },

    /// Intake id is empty or contains control characters
    #[error("Invalid intake id: {0:?}")]
    InvalidIntakeId(String),

    /// No case stored under the given id
    #[error("Case not found: {0}")]
    CaseNotFound(String),

    /// A case with the same id already exists
    #[error("Case already exists: {0}")]
    DuplicateCase(String),

    /// Unknown case status label
    #[error("Invalid case status: {0}")]
    InvalidStatus(String),

    /// Assignee name is empty or contains control characters
    #[error("Invalid assignee: {0:?}")]
    InvalidAssignee(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Binary serialization errors
    #[error("Binary serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// CSV export errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Case store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// General error with context
    #[error("{0}")]
    Other(String),
}

impl IntakeError {
    /// True for rejections caused by the submitted intake itself, which an
    /// API layer should surface as a validation failure.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyText
                | Self::ConsentRequired
                | Self::InvalidConsentType(_)
                | Self::TextTooLong { .. }
                | Self::InvalidIntakeId(_)
        )
    }
}

/// Convenience type alias for Result with `IntakeError`
pub type Result<T> = std::result::Result<T, IntakeError>;

impl From<anyhow::Error> for IntakeError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

impl From<sled::Error> for IntakeError {
    fn from(err: sled::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
