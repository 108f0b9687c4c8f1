use anyhow::Result;
use metrics::{counter, histogram};
use std::time::Duration;

use crate::models::{CaseStatus, RedactionField, RiskLevel};

/// Intakes that completed the pipeline
pub const INTAKES_PROCESSED: &str = "hopechain_intakes_processed_total";
/// Intakes rejected by validation
pub const INTAKES_REJECTED: &str = "hopechain_intakes_rejected_total";
/// Escalated intakes, by reason
pub const ESCALATIONS: &str = "hopechain_escalations_total";
/// Redacted PII kinds, by field
pub const REDACTIONS: &str = "hopechain_redactions_total";
/// Microstories produced by the extractive fallback
pub const MICROSTORY_FALLBACKS: &str = "hopechain_microstory_fallbacks_total";
/// Case status changes, by target status
pub const STATUS_TRANSITIONS: &str = "hopechain_case_status_transitions_total";
/// Reports written, by format
pub const REPORTS_EXPORTED: &str = "hopechain_reports_exported_total";
/// Distribution of composite risk scores
pub const RISK_SCORE: &str = "hopechain_risk_score";
/// End-to-end intake processing time
pub const INTAKE_DURATION: &str = "hopechain_intake_duration_seconds";

/// Metrics facade for the intake pipeline.
///
/// Emits through the `metrics` macros; without an installed recorder every
/// call is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntakeMetrics;

impl IntakeMetrics {
    /// Install the no-op recorder. Fails if a recorder is already set.
    pub fn init() -> Result<()> {
        metrics::set_global_recorder(metrics::NoopRecorder)
            .map_err(|e| anyhow::anyhow!("Failed to initialize metrics recorder: {}", e))?;
        Ok(())
    }

    /// Record a completed intake
    pub fn record_intake(
        &self,
        risk_level: RiskLevel,
        risk_score: f64,
        redacted_fields: &[RedactionField],
        duration: Duration,
    ) {
        counter!(INTAKES_PROCESSED, "risk_level" => risk_level.label()).increment(1);
        histogram!(RISK_SCORE).record(risk_score);
        histogram!(INTAKE_DURATION).record(duration.as_secs_f64());
        for field in redacted_fields {
            counter!(REDACTIONS, "field" => field.label()).increment(1);
        }
    }

    /// Record an intake rejected before processing
    pub fn record_rejection(&self, reason: &'static str) {
        counter!(INTAKES_REJECTED, "reason" => reason).increment(1);
    }

    /// Record an escalation; `reason` is the risk reason or a safety flag
    pub fn record_escalation(&self, reason: &str) {
        let reason = if reason.is_empty() {
            "composite".to_string()
        } else {
            reason.to_string()
        };
        counter!(ESCALATIONS, "reason" => reason).increment(1);
    }

    /// Record a microstory produced by the fallback path
    pub fn record_microstory_fallback(&self, rewriter: &'static str) {
        counter!(MICROSTORY_FALLBACKS, "rewriter" => rewriter).increment(1);
    }

    /// Record a case status change
    pub fn record_status_transition(&self, status: CaseStatus) {
        counter!(STATUS_TRANSITIONS, "status" => status.label()).increment(1);
    }

    /// Record a written report
    pub fn record_export(&self, format: &'static str) {
        counter!(REPORTS_EXPORTED, "format" => format).increment(1);
    }
}
