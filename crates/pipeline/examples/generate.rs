//! Run the full pipeline against a local Ollama instance:
//!
//! ```text
//! cargo run --example generate -- notes.txt
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use pipeline::QuizPipeline;
use quizgen::{QuestionType, QuizConfig, QuizDifficulty};
use textgen::{OllamaClient, OllamaConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let path = std::env::args()
        .nth(1)
        .context("usage: generate <text-file>")?;
    let raw_text = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("failed to read {path}"))?;

    let client = Arc::new(OllamaClient::new(OllamaConfig::default()));
    let pipeline = QuizPipeline::new(client);

    let config = QuizConfig {
        question_count: 6,
        difficulty: QuizDifficulty::Mixed,
        question_types: vec![
            QuestionType::Mcq,
            QuestionType::TrueFalse,
            QuestionType::ShortAnswer,
        ],
        time_limit_secs: None,
        professional_scenarios: false,
        certification_level: false,
        cross_topic_integration: false,
    };

    let output = pipeline.run(&path, &raw_text, &config).await?;

    if output.degraded {
        eprintln!("note: full pipeline failed, questions come from the fallback path");
    }
    println!("{}", serde_json::to_string_pretty(&output.questions)?);

    Ok(())
}
