use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::{ConsentType, OutputFormat};

/// Application configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Log level, destination and format
    pub logging: LoggingConfig,
    /// Intake validation limits
    pub intake: IntakeConfig,
    /// Microstory rewriter selection
    pub microstory: MicrostoryConfig,
    /// Case store backend
    pub storage: StorageConfig,
    /// Case report export
    pub report: ReportConfig,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `trace`, `debug`, `info`, `warn` or `error`
    pub level: String,
    /// Directory-qualified log file; enables the JSON file layer
    pub file_path: Option<String>,
    /// Console format: `text` or `json`
    pub format: String,
}

/// Intake validation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeConfig {
    /// Maximum testimony length in characters
    pub max_text_length: usize,
    /// Consent types accepted on intake
    pub allowed_consent_types: Vec<ConsentType>,
}

/// Which rewriter produces microstories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MicrostoryStrategy {
    /// Local inference process with extractive fallback
    LocalModel,
    /// Extractive method only
    Extractive,
}

/// Microstory settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MicrostoryConfig {
    /// Rewriter selection
    pub strategy: MicrostoryStrategy,
    /// Inference CLI, invoked as `<command> run <model>`
    pub command: String,
    /// Model identifier
    pub model: String,
    /// Hard timeout for the inference process
    pub timeout_secs: u64,
    /// Output at or below this many characters counts as a failure
    pub min_output_chars: usize,
}

/// Case store backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Process-local, lost on exit
    Memory,
    /// Embedded sled database at `storage.path`
    Sled,
}

/// Case store settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend selection
    pub backend: StorageBackend,
    /// Directory of the sled database
    pub path: String,
}

/// Report export settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Directory reports are written to
    pub output_directory: String,
    /// Format used when none is given
    pub default_format: OutputFormat,
    /// Wrap width of text reports
    pub line_width: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
                format: "text".to_string(),
            },
            intake: IntakeConfig {
                max_text_length: 10000,
                allowed_consent_types: vec![ConsentType::SelfConsent, ConsentType::Guardian],
            },
            microstory: MicrostoryConfig {
                strategy: MicrostoryStrategy::LocalModel,
                command: "ollama".to_string(),
                model: "phi3.5".to_string(),
                timeout_secs: 20,
                min_output_chars: 10,
            },
            storage: StorageConfig {
                backend: StorageBackend::Sled,
                path: ".hopechain_cases".to_string(),
            },
            report: ReportConfig {
                output_directory: "./reports".to_string(),
                default_format: OutputFormat::Txt,
                line_width: 80,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, with an optional explicit file layered over the
    /// default locations and under the environment.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let defaults = Config::try_from(&Self::default())
            .context("Failed to serialize default configuration")?;

        let mut builder = Config::builder()
            // Start with default values
            .add_source(defaults)
            // Add config files if they exist
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(File::with_name("hopechain").required(false));

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        // Add environment variables with prefix, e.g. HOPECHAIN_MICROSTORY__TIMEOUT_SECS
        let config = builder
            .add_source(
                Environment::with_prefix("HOPECHAIN")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to load configuration")?;

        let app_config: Self = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        // Validate configuration
        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Validate logging config
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level,
                valid_levels
            ));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log format: {}. Must be one of: {:?}",
                self.logging.format,
                valid_formats
            ));
        }

        // Validate intake config
        if self.intake.max_text_length == 0 {
            return Err(anyhow::anyhow!("max_text_length must be greater than 0"));
        }
        if self.intake.allowed_consent_types.is_empty() {
            return Err(anyhow::anyhow!("allowed_consent_types must not be empty"));
        }

        // Validate microstory config
        if self.microstory.timeout_secs == 0 {
            return Err(anyhow::anyhow!("microstory timeout_secs must be greater than 0"));
        }
        let microstory = &self.microstory;
        if microstory.strategy == MicrostoryStrategy::LocalModel
            && (microstory.command.trim().is_empty() || microstory.model.trim().is_empty())
        {
            return Err(anyhow::anyhow!(
                "microstory command and model are required for the local_model strategy"
            ));
        }

        // Validate storage config
        if self.storage.backend == StorageBackend::Sled && self.storage.path.trim().is_empty() {
            return Err(anyhow::anyhow!("storage path is required for the sled backend"));
        }

        // Validate report config
        if self.report.line_width < 20 {
            return Err(anyhow::anyhow!("report line_width must be at least 20"));
        }
        if self.report.output_directory.trim().is_empty() {
            return Err(anyhow::anyhow!("report output_directory must not be empty"));
        }

        Ok(())
    }

    /// Get log level from environment or config
    #[must_use]
    pub fn get_log_level(&self) -> String {
        std::env::var("RUST_LOG").unwrap_or_else(|_| self.logging.level.clone())
    }
}
