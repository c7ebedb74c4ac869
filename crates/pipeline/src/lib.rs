pub mod fallback;

pub use fallback::FallbackGenerator;

use std::fmt;
use std::sync::Arc;

use content::ContentProcessor;
use content::schema::ProcessedContent;
use quizgen::{AdvancedQuizQuestion, QuestionGenerator, QuizConfig};
use serde::Serialize;
use textgen::{GenerationError, TextGenerator};
use thiserror::Error;
use tracing::{info, warn};

/// Where a run was when its primary path failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Processing,
    Generating,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Processing => write!(f, "content processing"),
            Self::Generating => write!(f, "question generation"),
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{stage} failed ({primary}), and the fallback generator also failed: {fallback}")]
    FallbackFailed {
        stage: Stage,
        primary: GenerationError,
        #[source]
        fallback: GenerationError,
    },
}

#[derive(Debug, Serialize)]
pub struct PipelineOutput {
    pub document_id: String,
    pub questions: Vec<AdvancedQuizQuestion>,
    /// Absent on the fallback path, which skips content analysis.
    pub content: Option<ProcessedContent>,
    /// True when the questions came from the single-prompt fallback;
    /// callers surface this as a partial success.
    pub degraded: bool,
}

/// Sequences content processing and question generation, with a
/// single-prompt fallback when either stage fails hard.
///
/// Per run: Processing -> Generating -> Done, with the alternate edge
/// Processing|Generating -> Fallback -> Done|Failed. Each run is fresh
/// and independent; nothing is shared or persisted between runs.
pub struct QuizPipeline {
    processor: ContentProcessor,
    generator: QuestionGenerator,
    fallback: FallbackGenerator,
}

impl QuizPipeline {
    pub fn new(client: Arc<dyn TextGenerator>) -> Self {
        Self {
            processor: ContentProcessor::new(client.clone()),
            generator: QuestionGenerator::new(client.clone()),
            fallback: FallbackGenerator::new(client),
        }
    }

    pub async fn run(
        &self,
        document_id: &str,
        raw_text: &str,
        config: &QuizConfig,
    ) -> Result<PipelineOutput, PipelineError> {
        match self.run_primary(document_id, raw_text, config).await {
            Ok(output) => Ok(output),
            Err((stage, primary)) => {
                warn!(
                    document_id,
                    %stage,
                    error = %primary,
                    "primary pipeline failed, trying single-prompt fallback"
                );
                match self.fallback.generate(raw_text, config).await {
                    Ok(questions) => {
                        info!(
                            document_id,
                            questions = questions.len(),
                            "fallback generation succeeded"
                        );
                        Ok(PipelineOutput {
                            document_id: document_id.to_string(),
                            questions,
                            content: None,
                            degraded: true,
                        })
                    }
                    Err(fallback) => Err(PipelineError::FallbackFailed {
                        stage,
                        primary,
                        fallback,
                    }),
                }
            }
        }
    }

    async fn run_primary(
        &self,
        document_id: &str,
        raw_text: &str,
        config: &QuizConfig,
    ) -> Result<PipelineOutput, (Stage, GenerationError)> {
        let content = self
            .processor
            .process_document(document_id, raw_text)
            .await
            .map_err(|e| (Stage::Processing, e))?;

        info!(
            document_id,
            entities = content.entities.len(),
            concepts = content.concepts.len(),
            chunks = content.chunks.len(),
            "content processed"
        );

        let questions = self
            .generator
            .generate_questions(&content, config)
            .await
            .map_err(|e| (Stage::Generating, e))?;

        info!(
            document_id,
            questions = questions.len(),
            "questions generated"
        );

        Ok(PipelineOutput {
            document_id: document_id.to_string(),
            questions,
            content: Some(content),
            degraded: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use quizgen::{QuestionType, QuizDifficulty};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct ScriptedClient {
        replies: Mutex<VecDeque<Result<String, GenerationError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedClient {
        fn new(replies: Vec<Result<String, GenerationError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn prompt_count(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedClient {
        async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok("{}".to_string()))
        }
    }

    const SOURCE: &str =
        "The mitochondria is the powerhouse of the cell. It produces ATP through respiration.";

    fn config() -> QuizConfig {
        QuizConfig {
            question_count: 2,
            difficulty: QuizDifficulty::Intermediate,
            question_types: vec![QuestionType::Mcq],
            time_limit_secs: None,
            professional_scenarios: false,
            certification_level: false,
            cross_topic_integration: false,
        }
    }

    fn mcq_batch(count: usize) -> String {
        let questions: Vec<String> = (0..count)
            .map(|i| {
                format!(
                    r#"{{"id": "q{i}", "type": "mcq", "question": "What does the mitochondria produce, attempt {i}?", "correct_answer": "ATP", "explanation": "The mitochondria produces ATP during cellular respiration."}}"#
                )
            })
            .collect();
        format!(r#"{{"questions": [{}]}}"#, questions.join(","))
    }

    #[tokio::test]
    async fn test_primary_path() {
        // analysis (no entities -> no relationship call), then one type
        let client = ScriptedClient::new(vec![
            Ok(r#"{"topics": ["Cell biology"], "difficulty": "intermediate"}"#.to_string()),
            Ok(mcq_batch(2)),
        ]);
        let pipeline = QuizPipeline::new(client.clone());

        let output = pipeline.run("doc-1", SOURCE, &config()).await.unwrap();

        assert!(!output.degraded);
        assert_eq!(output.questions.len(), 2);
        assert!(output.content.is_some());
        assert_eq!(client.prompt_count(), 2);
    }

    #[tokio::test]
    async fn test_generation_hard_failure_triggers_fallback() {
        let client = ScriptedClient::new(vec![
            Ok("{}".to_string()),                   // analysis, degenerate
            Err(GenerationError::RateLimited),      // mcq generation
            Ok(mcq_batch(2)),                       // fallback
        ]);
        let pipeline = QuizPipeline::new(client.clone());

        let output = pipeline.run("doc-1", SOURCE, &config()).await.unwrap();

        assert!(output.degraded);
        assert!(output.content.is_none());
        assert_eq!(output.questions.len(), 2);
        assert_eq!(client.prompt_count(), 3);
    }

    #[tokio::test]
    async fn test_processing_hard_failure_triggers_fallback() {
        let client = ScriptedClient::new(vec![
            Err(GenerationError::QuotaExhausted), // analysis
            Ok(mcq_batch(1)),                     // fallback
        ]);
        let pipeline = QuizPipeline::new(client);

        let output = pipeline.run("doc-1", SOURCE, &config()).await.unwrap();

        assert!(output.degraded);
        assert_eq!(output.questions.len(), 1);
    }

    #[tokio::test]
    async fn test_fallback_failure_is_terminal() {
        let client = ScriptedClient::new(vec![
            Ok("{}".to_string()),              // analysis, degenerate
            Err(GenerationError::RateLimited), // mcq generation
            Err(GenerationError::Timeout),     // fallback
        ]);
        let pipeline = QuizPipeline::new(client);

        let err = pipeline.run("doc-1", SOURCE, &config()).await.unwrap_err();

        let PipelineError::FallbackFailed {
            stage,
            primary,
            fallback,
        } = err;
        assert_eq!(stage, Stage::Generating);
        assert!(matches!(primary, GenerationError::RateLimited));
        assert!(matches!(fallback, GenerationError::Timeout));
    }

    #[tokio::test]
    async fn test_fallback_tolerates_prose_wrapped_json() {
        let reply = format!("Here is your quiz:\n```json\n{}\n```", mcq_batch(2));
        let client = ScriptedClient::new(vec![
            Err(GenerationError::Unauthorized), // analysis
            Ok(reply),                          // fallback
        ]);
        let pipeline = QuizPipeline::new(client);

        let output = pipeline.run("doc-1", SOURCE, &config()).await.unwrap();

        assert!(output.degraded);
        assert_eq!(output.questions.len(), 2);
        assert!(
            output
                .questions
                .iter()
                .all(|q| q.question_type == QuestionType::Mcq)
        );
    }

    #[tokio::test]
    async fn test_fallback_truncates_to_question_count() {
        let client = ScriptedClient::new(vec![
            Err(GenerationError::QuotaExhausted), // analysis
            Ok(mcq_batch(5)),                     // fallback over-delivers
        ]);
        let pipeline = QuizPipeline::new(client);

        let output = pipeline.run("doc-1", SOURCE, &config()).await.unwrap();
        assert_eq!(output.questions.len(), 2);
    }
}
