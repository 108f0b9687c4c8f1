//! Tests for microstory generation and its fallback

use std::time::Duration;

use hopechain_intake::config::{AppConfig, MicrostoryStrategy};
use hopechain_intake::microstory::{
    extractive_microstory, LocalModelRewriter, MicrostoryGenerator, TextRewriter,
    CLOSING_CLAUSE, ILLUSTRATION_PROMPTS,
};

#[test]
fn test_extractive_question_and_exclamation_split() {
    let (story, prompts) =
        extractive_microstory("Where is mama? I looked everywhere! Nobody knew.");
    assert_eq!(
        story,
        format!("Where is mama? I looked everywhere!{CLOSING_CLAUSE}")
    );
    assert_eq!(prompts, ILLUSTRATION_PROMPTS.map(String::from).to_vec());
}

#[test]
fn test_extractive_without_sentence_breaks() {
    let (story, _) = extractive_microstory("we walked for three days");
    assert_eq!(story, format!("we walked for three days{CLOSING_CLAUSE}"));
}

#[test]
fn test_extractive_short_sentences_fall_back_to_whole_text() {
    let (story, _) = extractive_microstory("No. Yes. We stayed.");
    assert_eq!(story, format!("No. Yes. We stayed.{CLOSING_CLAUSE}"));
}

#[test]
fn test_generator_follows_configuration() {
    let mut config = AppConfig::default();
    assert_eq!(
        MicrostoryGenerator::from_config(&config.microstory).rewriter_name(),
        "local_model"
    );

    config.microstory.strategy = MicrostoryStrategy::Extractive;
    assert_eq!(
        MicrostoryGenerator::from_config(&config.microstory).rewriter_name(),
        "extractive"
    );
}

#[tokio::test]
async fn test_absent_binary_falls_back() {
    let generator = MicrostoryGenerator::new(Box::new(LocalModelRewriter::new(
        "hopechain-missing-inference-cli",
        "phi3.5",
        Duration::from_secs(1),
        10,
    )));
    let generated = generator.generate("We found a dry place to sleep.").await;
    assert!(generated.fell_back);
    assert_eq!(
        generated.story,
        format!("We found a dry place to sleep.{CLOSING_CLAUSE}")
    );
}

#[cfg(unix)]
#[tokio::test]
async fn test_failing_process_falls_back() {
    // `false run <model>` exits non-zero immediately
    let rewriter = LocalModelRewriter::new("false", "phi3.5", Duration::from_secs(5), 10);
    assert!(rewriter.rewrite("text").await.is_err());

    let generator = MicrostoryGenerator::new(Box::new(rewriter));
    let (curated, fell_back) = generator.curate("The rain stopped.").await;
    assert!(fell_back);
    assert_eq!(curated.microstory, format!("The rain stopped.{CLOSING_CLAUSE}"));
    assert_eq!(curated.illustration_prompts.len(), 2);
}
