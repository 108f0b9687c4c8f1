//! Microstory generation.
//!
//! A [`TextRewriter`] produces the story; the deterministic extractive
//! method is the mandatory fallback. Rewriter failures (missing binary,
//! non-zero exit, timeout, implausibly short output) are logged and never
//! returned to the caller.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::{MicrostoryConfig, MicrostoryStrategy};
use crate::models::CuratedOutput;
use crate::utils::split_sentences;

/// Closing clause appended by the extractive method
pub const CLOSING_CLAUSE: &str = " They hold onto hope and dream of a kinder tomorrow.";

/// Fixed illustration prompts
pub const ILLUSTRATION_PROMPTS: [&str; 2] = [
    "A gentle, storybook-style illustration of a child holding a small toy",
    "A soft watercolor sunrise behind a humble home",
];

/// Below this many characters the first two sentences are replaced by the
/// whole text
const MIN_BASE_CHARS: usize = 10;

/// Why a rewriter produced no story
#[derive(Debug, Error)]
pub enum RewriteError {
    /// The process could not be started, e.g. binary not installed
    #[error("failed to start rewriter process: {0}")]
    Spawn(#[source] std::io::Error),

    /// I/O with the running process failed
    #[error("rewriter I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The process did not finish in time
    #[error("rewriter timed out after {0:?}")]
    Timeout(Duration),

    /// The process exited unsuccessfully
    #[error("rewriter exited with status {0:?}")]
    ExitStatus(Option<i32>),

    /// Output too short to be a story
    #[error("rewriter output too short ({0} chars)")]
    OutputTooShort(usize),
}

/// Strategy for turning safe text into a short story
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextRewriter: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Rewrite `safe_text` into a microstory
    async fn rewrite(&self, safe_text: &str) -> Result<String, RewriteError>;
}

/// Deterministic extractive story plus illustration prompts.
///
/// Takes the first two sentences (split after `.`, `!` or `?` followed by
/// whitespace); if that is shorter than 10 characters the whole text is used.
#[must_use]
pub fn extractive_microstory(safe_text: &str) -> (String, Vec<String>) {
    let sentences = split_sentences(safe_text);
    let mut base = sentences
        .iter()
        .take(2)
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string();
    if base.chars().count() < MIN_BASE_CHARS {
        base = safe_text.to_string();
    }

    let story = format!("{base}{CLOSING_CLAUSE}");
    let prompts = ILLUSTRATION_PROMPTS.iter().map(ToString::to_string).collect();
    (story, prompts)
}

/// Instruction prompt sent to the generative rewriter
#[must_use]
pub fn rewrite_prompt(safe_text: &str) -> String {
    format!(
        "Rewrite this as a short, warm microstory (2-3 sentences). \
         Do NOT invent details. Keep [REDACTED_NAME] untouched.\n\nTEXT: {safe_text}"
    )
}

/// Rewriter backed by [`extractive_microstory`]; never fails
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractiveRewriter;

#[async_trait]
impl TextRewriter for ExtractiveRewriter {
    fn name(&self) -> &'static str {
        "extractive"
    }

    async fn rewrite(&self, safe_text: &str) -> Result<String, RewriteError> {
        Ok(extractive_microstory(safe_text).0)
    }
}

/// Rewriter that shells out to a local inference CLI (`<command> run <model>`),
/// feeding the prompt on stdin.
#[derive(Debug, Clone)]
pub struct LocalModelRewriter {
    command: String,
    model: String,
    timeout: Duration,
    min_output_chars: usize,
}

impl LocalModelRewriter {
    /// Create a rewriter for `command run model` with a hard timeout
    #[must_use]
    pub fn new(
        command: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
        min_output_chars: usize,
    ) -> Self {
        Self {
            command: command.into(),
            model: model.into(),
            timeout,
            min_output_chars,
        }
    }

    async fn run(&self, prompt: String) -> Result<std::process::Output, RewriteError> {
        let mut child = Command::new(&self.command)
            .arg("run")
            .arg(&self.model)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(RewriteError::Spawn)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(prompt.as_bytes()).await?;
            stdin.shutdown().await?;
        }

        Ok(child.wait_with_output().await?)
    }
}

#[async_trait]
impl TextRewriter for LocalModelRewriter {
    fn name(&self) -> &'static str {
        "local_model"
    }

    async fn rewrite(&self, safe_text: &str) -> Result<String, RewriteError> {
        let prompt = rewrite_prompt(safe_text);

        // Dropping the timed-out future drops the child, which kills it
        let output = timeout(self.timeout, self.run(prompt))
            .await
            .map_err(|_| RewriteError::Timeout(self.timeout))??;

        if !output.status.success() {
            return Err(RewriteError::ExitStatus(output.status.code()));
        }

        let story = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let chars = story.chars().count();
        if chars <= self.min_output_chars {
            return Err(RewriteError::OutputTooShort(chars));
        }
        Ok(story)
    }
}

/// A generated story and whether the fallback produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedStory {
    /// The story text
    pub story: String,
    /// True if the primary rewriter failed
    pub fell_back: bool,
}

/// Runs the configured rewriter with extractive fallback
pub struct MicrostoryGenerator {
    rewriter: Box<dyn TextRewriter>,
}

impl MicrostoryGenerator {
    /// Generator around an explicit rewriter
    #[must_use]
    pub fn new(rewriter: Box<dyn TextRewriter>) -> Self {
        Self { rewriter }
    }

    /// Generator that only uses the extractive method
    #[must_use]
    pub fn extractive() -> Self {
        Self::new(Box::new(ExtractiveRewriter))
    }

    /// Generator selected by configuration
    #[must_use]
    pub fn from_config(config: &MicrostoryConfig) -> Self {
        match config.strategy {
            MicrostoryStrategy::Extractive => Self::extractive(),
            MicrostoryStrategy::LocalModel => Self::new(Box::new(LocalModelRewriter::new(
                config.command.clone(),
                config.model.clone(),
                Duration::from_secs(config.timeout_secs),
                config.min_output_chars,
            ))),
        }
    }

    /// Name of the primary rewriter
    #[must_use]
    pub fn rewriter_name(&self) -> &'static str {
        self.rewriter.name()
    }

    /// Generate a story, recording whether the fallback was used
    pub async fn generate(&self, safe_text: &str) -> GeneratedStory {
        match self.rewriter.rewrite(safe_text).await {
            Ok(story) => {
                debug!(rewriter = self.rewriter.name(), "Microstory generated");
                GeneratedStory {
                    story,
                    fell_back: false,
                }
            }
            Err(e) => {
                warn!(
                    rewriter = self.rewriter.name(),
                    error = %e,
                    "Microstory rewriter failed, using extractive fallback"
                );
                GeneratedStory {
                    story: extractive_microstory(safe_text).0,
                    fell_back: true,
                }
            }
        }
    }

    /// Generate a story; never fails
    pub async fn generate_microstory(&self, safe_text: &str) -> String {
        self.generate(safe_text).await.story
    }

    /// Story plus the fixed illustration prompts
    pub async fn curate(&self, safe_text: &str) -> (CuratedOutput, bool) {
        let generated = self.generate(safe_text).await;
        let (_, illustration_prompts) = extractive_microstory(safe_text);
        (
            CuratedOutput {
                microstory: generated.story,
                illustration_prompts,
            },
            generated.fell_back,
        )
    }
}

impl Default for MicrostoryGenerator {
    fn default() -> Self {
        Self::extractive()
    }
}
