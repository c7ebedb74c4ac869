use rand::seq::SliceRandom;
use rand::thread_rng;

use crate::schema::{AdvancedQuizQuestion, Answer, QuestionType, QuizConfig};

const OPTION_LABELS: [&str; 4] = ["A", "B", "C", "D"];

/// Take up to the per-type target from each requested type, walking the
/// config's type order, then shuffle the merged set.
pub fn balance(
    questions: Vec<AdvancedQuizQuestion>,
    config: &QuizConfig,
) -> Vec<AdvancedQuizQuestion> {
    let per_type = config.per_type_target();

    let mut balanced: Vec<AdvancedQuizQuestion> = config
        .question_types
        .iter()
        .flat_map(|question_type| {
            questions
                .iter()
                .filter(|q| q.question_type == *question_type)
                .take(per_type)
                .cloned()
        })
        .collect();

    balanced.shuffle(&mut thread_rng());
    balanced
}

/// Rotate correct answers across option positions so the key does not
/// cluster on one letter. Only 4-option multiple choice questions with a
/// single correct answer participate; each one gets the next target
/// letter in A-D order and has its options reordered to match.
pub fn rotate_mcq_answers(questions: &mut [AdvancedQuizQuestion]) {
    let mut slot = 0usize;

    for question in questions.iter_mut() {
        if question.question_type != QuestionType::Mcq {
            continue;
        }
        let correct = match &question.correct_answer {
            Answer::Single(s) => s.clone(),
            Answer::Multiple(_) => continue,
        };
        let Some(options) = question.options.as_mut() else {
            continue;
        };
        if options.len() != OPTION_LABELS.len() {
            continue;
        }
        let Some(current) = options.iter().position(|option| *option == correct) else {
            continue;
        };

        let target = slot % OPTION_LABELS.len();
        options.swap(current, target);
        question.metadata.answer_distribution = Some(OPTION_LABELS[target].to_string());
        slot += 1;
    }
}
