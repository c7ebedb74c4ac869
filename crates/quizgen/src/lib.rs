pub mod balance;
pub mod prompt;
pub mod quality;
pub mod schema;

pub use quality::{QualityReport, assess, threshold};
pub use schema::{
    AdvancedQuizQuestion, Answer, QuestionMetadata, QuestionType, QuizConfig, QuizDifficulty,
};

use std::sync::Arc;

use content::schema::ProcessedContent;
use futures::future::join_all;
use textgen::{GenerationError, TextGenerator, json};
use tracing::{debug, warn};

/// Produces a quality-filtered, type-balanced question set from processed
/// content. One prompt per requested type, dispatched concurrently; a
/// failed type yields zero questions without touching its siblings.
pub struct QuestionGenerator {
    client: Arc<dyn TextGenerator>,
}

impl QuestionGenerator {
    pub fn new(client: Arc<dyn TextGenerator>) -> Self {
        Self { client }
    }

    pub async fn generate_questions(
        &self,
        content: &ProcessedContent,
        config: &QuizConfig,
    ) -> Result<Vec<AdvancedQuizQuestion>, GenerationError> {
        let per_type = config.per_type_target();

        let batches = join_all(
            config
                .question_types
                .iter()
                .map(|t| self.generate_for_type(*t, content, config, per_type)),
        )
        .await;

        let mut questions = Vec::new();
        for batch in batches {
            questions.extend(batch?);
        }

        let generated = questions.len();
        questions.retain(|q| quality::passes(q, config.certification_level));
        debug!(
            document_id = %content.document_id,
            generated,
            kept = questions.len(),
            "quality filter applied"
        );

        let mut questions = balance::balance(questions, config);
        questions.truncate(config.question_count);
        balance::rotate_mcq_answers(&mut questions);

        Ok(questions)
    }

    async fn generate_for_type(
        &self,
        question_type: QuestionType,
        content: &ProcessedContent,
        config: &QuizConfig,
        count: usize,
    ) -> Result<Vec<AdvancedQuizQuestion>, GenerationError> {
        let prompt = prompt::build_prompt(question_type, content, config, count);

        let reply = match self.client.generate(&prompt).await {
            Ok(reply) => reply,
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                warn!(
                    question_type = question_type.as_str(),
                    error = %err,
                    "generation failed for one question type"
                );
                return Ok(Vec::new());
            }
        };

        match json::parse_object::<schema::QuestionBatchReply>(&reply) {
            Ok(batch) => Ok(batch.into_questions(question_type, config)),
            Err(err) => {
                warn!(
                    question_type = question_type.as_str(),
                    error = %err,
                    "unparseable reply for one question type"
                );
                Ok(Vec::new())
            }
        }
    }
}
