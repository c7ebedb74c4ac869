//! Quality scoring for generated questions.
//!
//! Each question gets a 0-100 composite score, the unweighted mean of
//! clarity, relevance, and uniqueness sub-scores. Scoring is a pure
//! function of the question's fields, so re-scoring an accepted question
//! always reproduces the decision.

use crate::schema::AdvancedQuizQuestion;

pub const CERTIFICATION_THRESHOLD: u32 = 70;
pub const STANDARD_THRESHOLD: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityReport {
    pub clarity: u32,
    pub relevance: u32,
    pub uniqueness: u32,
}

impl QualityReport {
    pub fn score(&self) -> u32 {
        (self.clarity + self.relevance + self.uniqueness) / 3
    }
}

pub fn assess(question: &AdvancedQuizQuestion) -> QualityReport {
    let mut clarity: i32 = 100;
    if question.question.len() < 20 {
        clarity -= 20;
    }
    if question.question.contains("the document") {
        clarity -= 50;
    }

    let mut relevance: i32 = 100;
    if question.explanation.len() < 30 {
        relevance -= 20;
    }
    if question.professional_scenario.is_some() {
        relevance += 10;
    }

    // No near-duplicate detection yet, so every question counts as unique.
    let uniqueness: i32 = 100;

    QualityReport {
        clarity: clarity.clamp(0, 100) as u32,
        relevance: relevance.clamp(0, 100) as u32,
        uniqueness: uniqueness.clamp(0, 100) as u32,
    }
}

/// Minimum acceptable composite score. Certification-level quizzes hold a
/// stricter bar.
pub fn threshold(certification_level: bool) -> u32 {
    if certification_level {
        CERTIFICATION_THRESHOLD
    } else {
        STANDARD_THRESHOLD
    }
}

pub fn passes(question: &AdvancedQuizQuestion, certification_level: bool) -> bool {
    assess(question).score() >= threshold(certification_level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Answer, QuestionMetadata, QuestionType};

    fn question(text: &str, explanation: &str) -> AdvancedQuizQuestion {
        AdvancedQuizQuestion {
            id: "mcq-test".to_string(),
            question_type: QuestionType::Mcq,
            question: text.to_string(),
            options: None,
            correct_answer: Answer::Single("x".to_string()),
            explanation: explanation.to_string(),
            difficulty: "intermediate".to_string(),
            topic: "General".to_string(),
            professional_scenario: None,
            time_limit_secs: None,
            metadata: QuestionMetadata::default(),
        }
    }

    #[test]
    fn test_clean_question_scores_full_marks() {
        let q = question(
            "What role does the mitochondria play in respiration?",
            "The mitochondria produces ATP, the cell's energy currency.",
        );
        let report = assess(&q);

        assert_eq!(report.clarity, 100);
        assert_eq!(report.relevance, 100);
        assert_eq!(report.uniqueness, 100);
        assert_eq!(report.score(), 100);
    }

    #[test]
    fn test_short_question_penalized() {
        let q = question("Why ATP?", "A perfectly reasonable explanation of the answer.");
        assert_eq!(assess(&q).clarity, 80);
    }

    #[test]
    fn test_document_reference_penalized() {
        let q = question(
            "According to the document, what does ATP do?",
            "A perfectly reasonable explanation of the answer.",
        );
        assert_eq!(assess(&q).clarity, 50);
    }

    #[test]
    fn test_thin_explanation_penalized() {
        let q = question("What role does the mitochondria play?", "short");
        assert_eq!(assess(&q).relevance, 80);
    }

    #[test]
    fn test_professional_scenario_bonus_is_capped() {
        let mut q = question(
            "What role does the mitochondria play?",
            "The mitochondria produces ATP, the cell's energy currency.",
        );
        q.professional_scenario = Some("You are a lab technician.".to_string());

        // 100 + 10 capped back to 100
        assert_eq!(assess(&q).relevance, 100);
    }

    #[test]
    fn test_scoring_is_idempotent() {
        let q = question("Why ATP?", "short");
        assert_eq!(assess(&q), assess(&q));
        assert_eq!(
            passes(&q, true),
            passes(&q, true),
            "same fields, same decision"
        );
    }

    #[test]
    fn test_threshold_monotonicity() {
        // Anything the certification bar accepts, the standard bar accepts.
        assert!(threshold(true) >= threshold(false));
        assert_eq!(threshold(true), 70);
        assert_eq!(threshold(false), 60);
    }

    #[test]
    fn test_boundary_scores() {
        // Worst clarity (short + "the document") with a thin explanation:
        // (30 + 80 + 100) / 3 = 70 exactly.
        let q = question("the document?", "short");
        let report = assess(&q);
        assert_eq!(report.score(), 70);
        assert!(passes(&q, true));
        assert!(passes(&q, false));

        // A synthetic 69 is rejected at certification level but accepted
        // at the standard bar.
        let sixty_nine = QualityReport {
            clarity: 7,
            relevance: 100,
            uniqueness: 100,
        };
        assert_eq!(sixty_nine.score(), 69);
        assert!(sixty_nine.score() < threshold(true));
        assert!(sixty_nine.score() >= threshold(false));
    }
}
