//! Single-prompt fallback generation.
//!
//! When the full two-stage pipeline fails hard, one generic prompt asks
//! the service directly for a flat question list, skipping content
//! analysis entirely. Errors here are terminal; nothing is swallowed.

use std::sync::Arc;

use quizgen::schema::QuestionBatchReply;
use quizgen::{AdvancedQuizQuestion, QuizConfig};
use textgen::{GenerationError, TextGenerator, json};

const EXCERPT_CHARS: usize = 6000;

pub struct FallbackGenerator {
    client: Arc<dyn TextGenerator>,
}

impl FallbackGenerator {
    pub fn new(client: Arc<dyn TextGenerator>) -> Self {
        Self { client }
    }

    pub async fn generate(
        &self,
        raw_text: &str,
        config: &QuizConfig,
    ) -> Result<Vec<AdvancedQuizQuestion>, GenerationError> {
        let prompt = build_fallback_prompt(raw_text, config);
        let reply = self.client.generate(&prompt).await?;

        let batch: QuestionBatchReply = json::parse_object(&reply)?;
        let mut questions = batch.into_questions_coerced(config);
        questions.truncate(config.question_count);

        Ok(questions)
    }
}

fn build_fallback_prompt(raw_text: &str, config: &QuizConfig) -> String {
    let type_labels: Vec<&str> = config
        .question_types
        .iter()
        .map(|t| t.as_str())
        .collect();

    let excerpt = match raw_text.char_indices().nth(EXCERPT_CHARS) {
        Some((idx, _)) => &raw_text[..idx],
        None => raw_text,
    };

    format!(
        r#"Generate a quiz of exactly {count} questions from the study material below.

INSTRUCTIONS:
1. Use only these question types: {types}
2. Target difficulty: {difficulty}
3. Every question needs a correct_answer and a short explanation
4. Output ONLY valid JSON, nothing else

SCHEMA:
{{
  "questions": [
    {{"id": "q1", "type": "{first_type}", "question": "...", "options": ["...", "...", "...", "..."], "correct_answer": "...", "explanation": "...", "difficulty": "intermediate", "topic": "..."}}
  ]
}}

TEXT:
{excerpt}

JSON OUTPUT:"#,
        count = config.question_count,
        types = type_labels.join(", "),
        difficulty = config.difficulty.as_str(),
        first_type = type_labels.first().copied().unwrap_or("mcq"),
        excerpt = excerpt,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizgen::{QuestionType, QuizDifficulty};

    fn config() -> QuizConfig {
        QuizConfig {
            question_count: 2,
            difficulty: QuizDifficulty::Mixed,
            question_types: vec![QuestionType::Mcq, QuestionType::TrueFalse],
            time_limit_secs: None,
            professional_scenarios: false,
            certification_level: false,
            cross_topic_integration: false,
        }
    }

    #[test]
    fn test_prompt_names_count_types_and_text() {
        let prompt = build_fallback_prompt("Photosynthesis converts light to sugar.", &config());

        assert!(prompt.contains("exactly 2 questions"));
        assert!(prompt.contains("mcq, true_false"));
        assert!(prompt.contains("Photosynthesis converts light to sugar."));
    }
}
