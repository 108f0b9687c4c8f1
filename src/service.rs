use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::{AppConfig, IntakeConfig, ReportConfig, StorageBackend};
use crate::error::{IntakeError, Result};
use crate::file_writer::write_case_report;
use crate::logging::OperationTimer;
use crate::metrics::IntakeMetrics;
use crate::microstory::MicrostoryGenerator;
use crate::models::{Case, CaseStatus, IntakeRequest, IntakeResponse, OutputFormat};
use crate::pipeline::analyze_text;
use crate::report::render_case_report;
use crate::repository::{CaseRepository, InMemoryCaseStore, SledCaseStore};
use crate::utils::round_to;
use crate::validation::InputValidator;

/// Orchestrates validation, analysis, microstory generation and storage of
/// intakes, and the case workflow on top of the store.
pub struct IntakeService {
    intake: IntakeConfig,
    report: ReportConfig,
    generator: MicrostoryGenerator,
    repository: Box<dyn CaseRepository>,
    metrics: IntakeMetrics,
}

impl IntakeService {
    pub fn new(
        config: &AppConfig,
        generator: MicrostoryGenerator,
        repository: Box<dyn CaseRepository>,
    ) -> Self {
        Self {
            intake: config.intake.clone(),
            report: config.report.clone(),
            generator,
            repository,
            metrics: IntakeMetrics,
        }
    }

    /// Service with the generator and case store selected by configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let repository: Box<dyn CaseRepository> = match config.storage.backend {
            StorageBackend::Memory => Box::new(InMemoryCaseStore::new()),
            StorageBackend::Sled => Box::new(SledCaseStore::open(&config.storage.path)?),
        };
        let generator = MicrostoryGenerator::from_config(&config.microstory);
        info!(
            storage = ?config.storage.backend,
            rewriter = generator.rewriter_name(),
            "Intake service ready"
        );
        Ok(Self::new(config, generator, repository))
    }

    /// Validate, analyze and store one intake.
    ///
    /// The raw text is only kept on the stored case when the request sets
    /// `store_raw`; it is never logged.
    pub async fn process_intake(&self, request: &IntakeRequest) -> Result<IntakeResponse> {
        let timer = OperationTimer::new("process_intake");

        let consent_type = match InputValidator::validate_intake(request, &self.intake) {
            Ok(consent_type) => consent_type,
            Err(e) => return Err(self.reject(request, e)),
        };

        // Checked before analysis so a duplicate never reaches the rewriter;
        // the insert below still rejects a concurrent duplicate.
        match self.repository.get(&request.id).await {
            Ok(_) => {
                let duplicate = IntakeError::DuplicateCase(request.id.clone());
                return Err(self.reject(request, duplicate));
            }
            Err(IntakeError::CaseNotFound(_)) => {}
            Err(e) => return Err(e),
        }

        let mut analysis = analyze_text(&request.text)?;
        analysis.needs.confidence = round_to(analysis.needs.confidence, 2);

        let (curated, fell_back) = self.generator.curate(&analysis.safety.safe_text).await;
        if fell_back {
            self.metrics
                .record_microstory_fallback(self.generator.rewriter_name());
        }

        let response = IntakeResponse {
            intake_id: request.id.clone(),
            safety: analysis.safety,
            curated,
            needs: analysis.needs,
            emotion: analysis.emotion,
            risk: analysis.risk,
        };

        let raw_text = request.store_raw.then(|| request.text.clone());
        let case = Case::from_response(response.clone(), consent_type, raw_text);
        if let Err(e) = self.repository.insert(case).await {
            return Err(match e {
                IntakeError::DuplicateCase(_) => self.reject(request, e),
                other => other,
            });
        }

        if response.risk.should_escalate {
            warn!(
                intake_id = %response.intake_id,
                risk_score = response.risk.risk_score,
                reason = %response.risk.reason,
                "Intake escalated for urgent review"
            );
            self.metrics.record_escalation(&response.risk.reason);
        }

        self.metrics.record_intake(
            response.risk.risk_level,
            response.risk.risk_score,
            &response.safety.redacted_fields,
            timer.finish(),
        );
        info!(
            intake_id = %response.intake_id,
            risk_level = %response.risk.risk_level,
            redacted = ?response.safety.redacted_fields,
            "Intake processed"
        );

        Ok(response)
    }

    fn reject(&self, request: &IntakeRequest, error: IntakeError) -> IntakeError {
        warn!(intake_id = %request.id, error = %error, "Intake rejected");
        self.metrics.record_rejection(rejection_reason(&error));
        error
    }

    /// Fetch a stored case
    pub async fn get_case(&self, intake_id: &str) -> Result<Case> {
        self.repository.get(intake_id).await
    }

    /// All stored cases, oldest first
    pub async fn list_cases(&self) -> Result<Vec<Case>> {
        self.repository.list().await
    }

    /// Set a case's workflow status
    pub async fn update_status(&self, intake_id: &str, status: CaseStatus) -> Result<Case> {
        let case = self.repository.update_status(intake_id, status).await?;
        self.metrics.record_status_transition(status);
        info!(intake_id, status = %status, "Case status updated");
        Ok(case)
    }

    /// Assign a case to a volunteer or counsellor
    pub async fn assign_case(&self, intake_id: &str, assignee: &str) -> Result<Case> {
        InputValidator::validate_assignee(assignee)?;
        let case = self.repository.assign(intake_id, assignee).await?;
        self.metrics.record_status_transition(CaseStatus::Assigned);
        info!(intake_id, assignee, "Case assigned");
        Ok(case)
    }

    /// Close a case
    pub async fn resolve_case(&self, intake_id: &str) -> Result<Case> {
        let case = self.repository.resolve(intake_id).await?;
        self.metrics.record_status_transition(CaseStatus::Resolved);
        info!(intake_id, "Case resolved");
        Ok(case)
    }

    /// Text report of a case
    pub async fn case_report(&self, intake_id: &str) -> Result<String> {
        let case = self.repository.get(intake_id).await?;
        Ok(render_case_report(&case, self.report.line_width))
    }

    /// Write a case report file; format and directory default to the
    /// configured ones.
    pub async fn export_case(
        &self,
        intake_id: &str,
        format: Option<OutputFormat>,
        output_dir: Option<&Path>,
    ) -> Result<PathBuf> {
        let case = self.repository.get(intake_id).await?;
        let format = format.unwrap_or(self.report.default_format);
        let output_dir = output_dir.map_or_else(
            || PathBuf::from(&self.report.output_directory),
            Path::to_path_buf,
        );

        let path = write_case_report(&case, format, &output_dir, self.report.line_width)?;
        self.metrics.record_export(format.extension());
        Ok(path)
    }
}

/// Metric label for a validation failure
fn rejection_reason(error: &IntakeError) -> &'static str {
    match error {
        IntakeError::ConsentRequired => "consent_required",
        IntakeError::InvalidConsentType(_) => "invalid_consent_type",
        IntakeError::EmptyText => "empty_text",
        IntakeError::TextTooLong { .. } => "text_too_long",
        IntakeError::InvalidIntakeId(_) => "invalid_intake_id",
        IntakeError::DuplicateCase(_) => "duplicate_case",
        _ => "other",
    }
}
