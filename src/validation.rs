use crate::config::IntakeConfig;
use crate::error::{IntakeError, Result};
use crate::models::{ConsentType, IntakeRequest};

/// Maximum length of an intake id or assignee name
const MAX_IDENTIFIER_CHARS: usize = 128;

/// Validation of intake requests and case workflow input
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate an intake before any analysis stage runs.
    ///
    /// Checks, in order: consent flag, consent type, non-empty text, text
    /// length, intake id. Returns the parsed consent type.
    pub fn validate_intake(request: &IntakeRequest, config: &IntakeConfig) -> Result<ConsentType> {
        if !request.consent {
            return Err(IntakeError::ConsentRequired);
        }

        let consent_type = Self::validate_consent_type(request.consent_type.as_deref(), config)?;

        if request.text.trim().is_empty() {
            return Err(IntakeError::EmptyText);
        }

        let len = request.text.chars().count();
        if len > config.max_text_length {
            return Err(IntakeError::TextTooLong {
                len,
                max: config.max_text_length,
            });
        }

        Self::validate_intake_id(&request.id)?;

        Ok(consent_type)
    }

    /// Parse a consent type and check it is accepted
    pub fn validate_consent_type(
        consent_type: Option<&str>,
        config: &IntakeConfig,
    ) -> Result<ConsentType> {
        let raw = consent_type.ok_or(IntakeError::InvalidConsentType(None))?;
        let parsed: ConsentType = raw.parse()?;
        if !config.allowed_consent_types.contains(&parsed) {
            return Err(IntakeError::InvalidConsentType(Some(raw.to_string())));
        }
        Ok(parsed)
    }

    /// Validate a caller-supplied intake id
    pub fn validate_intake_id(id: &str) -> Result<()> {
        if !is_identifier(id) {
            return Err(IntakeError::InvalidIntakeId(id.to_string()));
        }
        Ok(())
    }

    /// Validate the volunteer or counsellor a case is assigned to
    pub fn validate_assignee(assignee: &str) -> Result<()> {
        if !is_identifier(assignee) {
            return Err(IntakeError::InvalidAssignee(assignee.to_string()));
        }
        Ok(())
    }
}

fn is_identifier(value: &str) -> bool {
    !value.trim().is_empty()
        && value.chars().count() <= MAX_IDENTIFIER_CHARS
        && !value.chars().any(char::is_control)
}
