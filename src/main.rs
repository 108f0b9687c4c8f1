use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tracing::{debug, info, warn};

use hopechain_intake::config::{AppConfig, MicrostoryStrategy};
use hopechain_intake::logging::init_logging;
use hopechain_intake::metrics::IntakeMetrics;
use hopechain_intake::models::{CaseStatus, ConsentType, IntakeRequest, OutputFormat};
use hopechain_intake::pipeline::analyze_text;
use hopechain_intake::service::IntakeService;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Anonymize testimonies and score them for escalation",
    long_about = None
)]
struct Cli {
    /// Configuration file layered over the defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level, overrides configuration (RUST_LOG still wins)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process and store one intake, printing the response as JSON
    Intake {
        /// Caller-supplied case id
        #[arg(short, long)]
        id: String,

        /// Who consented: self or guardian
        #[arg(long)]
        consent_type: ConsentType,

        /// Keep the raw text with the stored case
        #[arg(long)]
        store_raw: bool,

        /// Language code
        #[arg(long, default_value = "en")]
        lang: String,

        /// Use the extractive microstory method only
        #[arg(long)]
        extractive: bool,

        #[command(flatten)]
        input: TextInput,
    },
    /// Run the analysis stages without storing anything
    Analyze {
        #[command(flatten)]
        input: TextInput,
    },
    /// Inspect and update stored cases
    Cases {
        #[command(subcommand)]
        command: CaseCommands,
    },
}

#[derive(Subcommand)]
enum CaseCommands {
    /// List stored cases
    List {
        /// Only cases with this status
        #[arg(short, long)]
        status: Option<CaseStatus>,
    },
    /// Show one case as JSON
    Show { id: String },
    /// Set the workflow status of a case
    Status { id: String, status: CaseStatus },
    /// Assign a case to a volunteer or counsellor
    Assign { id: String, assignee: String },
    /// Mark a case resolved
    Resolve { id: String },
    /// Print or export a case report
    Report {
        id: String,

        /// Write a file in this format instead of printing the text report
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Output directory for the file
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
}

/// Testimony source: inline text, a file, or stdin when neither is given
#[derive(Args)]
struct TextInput {
    /// Testimony text
    #[arg(short, long, conflicts_with = "file")]
    text: Option<String>,

    /// File containing the testimony
    #[arg(short, long)]
    file: Option<PathBuf>,
}

impl TextInput {
    async fn read(&self) -> Result<String> {
        if let Some(text) = &self.text {
            return Ok(text.clone());
        }
        if let Some(path) = &self.file {
            return tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()));
        }
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("Failed to read testimony from stdin")?;
        Ok(text)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Load configuration
    let mut config = AppConfig::load_from(cli.config.as_deref())?;
    if let Some(level) = &cli.log_level {
        config.logging.level.clone_from(level);
        config.validate()?;
    }

    // Initialize logging; the guard flushes the file writer on exit
    let _guard = init_logging(
        Some(&config.get_log_level()),
        config.logging.file_path.as_deref().map(Path::new),
        &config.logging.format,
    )?;

    if let Err(e) = IntakeMetrics::init() {
        warn!(error = %e, "Metrics recorder not installed");
    }

    info!("Starting hopechain");

    match cli.command {
        Commands::Intake {
            id,
            consent_type,
            store_raw,
            lang,
            extractive,
            input,
        } => {
            if extractive {
                config.microstory.strategy = MicrostoryStrategy::Extractive;
            }
            let mut request = IntakeRequest::new(id, input.read().await?)
                .with_consent(consent_type)
                .with_store_raw(store_raw);
            request.lang = lang;

            let service = IntakeService::from_config(&config)?;
            let response = service.process_intake(&request).await?;
            print_json(&response)?;
        }
        Commands::Analyze { input } => {
            let analysis = analyze_text(&input.read().await?)?;
            print_json(&analysis)?;
        }
        Commands::Cases { command } => {
            let service = IntakeService::from_config(&config)?;
            run_case_command(&service, command).await?;
        }
    }

    Ok(())
}

async fn run_case_command(service: &IntakeService, command: CaseCommands) -> Result<()> {
    match command {
        CaseCommands::List { status } => {
            let cases: Vec<_> = service
                .list_cases()
                .await?
                .into_iter()
                .filter(|case| status.map_or(true, |status| case.status == status))
                .collect();
            debug!(count = cases.len(), "Listing cases");
            print_json(&cases)?;
        }
        CaseCommands::Show { id } => print_json(&service.get_case(&id).await?)?,
        CaseCommands::Status { id, status } => {
            print_json(&service.update_status(&id, status).await?)?;
        }
        CaseCommands::Assign { id, assignee } => {
            print_json(&service.assign_case(&id, &assignee).await?)?;
        }
        CaseCommands::Resolve { id } => print_json(&service.resolve_case(&id).await?)?,
        CaseCommands::Report {
            id,
            format,
            output_dir,
        } => {
            if format.is_none() && output_dir.is_none() {
                print!("{}", service.case_report(&id).await?);
            } else {
                let path = service
                    .export_case(&id, format, output_dir.as_deref())
                    .await?;
                println!("{}", path.display());
            }
        }
    }
    Ok(())
}

/// Pretty JSON on stdout; logs stay on stderr
fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, value).context("Failed to write JSON")?;
    std::io::Write::write_all(&mut handle, b"\n")?;
    Ok(())
}
