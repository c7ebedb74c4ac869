//! Per-type prompt construction.
//!
//! Each question type draws on a different slice of the processed
//! content: multiple choice leans on important entities and concepts,
//! true/false on relationship triples, fill-in-the-blank on key terms,
//! matching on concept/definition pairs, short answer on the concepts
//! that reward analysis.

use content::schema::ProcessedContent;

use crate::schema::{QuestionType, QuizConfig};

const MCQ_IMPORTANCE_FLOOR: u8 = 5;
const SHORT_ANSWER_IMPORTANCE_FLOOR: u8 = 7;
const FILL_BLANK_KEY_TERMS: usize = 20;

pub fn build_prompt(
    question_type: QuestionType,
    content: &ProcessedContent,
    config: &QuizConfig,
    count: usize,
) -> String {
    match question_type {
        QuestionType::Mcq => build_mcq_prompt(content, config, count),
        QuestionType::TrueFalse => build_true_false_prompt(content, config, count),
        QuestionType::FillBlank => build_fill_blank_prompt(content, config, count),
        QuestionType::Matching => build_matching_prompt(content, config, count),
        QuestionType::ShortAnswer => build_short_answer_prompt(content, config, count),
    }
}

fn build_mcq_prompt(content: &ProcessedContent, config: &QuizConfig, count: usize) -> String {
    let mut context = String::from("IMPORTANT ENTITIES:\n");
    for entity in content
        .entities
        .iter()
        .filter(|e| e.importance >= MCQ_IMPORTANCE_FLOOR)
        .take(12)
    {
        context.push_str(&format!(
            "- {} ({}): {}\n",
            entity.text,
            entity.entity_type.as_str(),
            entity.context
        ));
    }

    context.push_str("\nKEY CONCEPTS:\n");
    for concept in content
        .concepts
        .iter()
        .filter(|c| c.importance >= MCQ_IMPORTANCE_FLOOR)
        .take(8)
    {
        context.push_str(&format!("- {}: {}\n", concept.name, concept.description));
    }

    format!(
        r#"Generate {count} multiple choice questions about the material below.

INSTRUCTIONS:
1. Every question has exactly 4 options with one correct answer
2. Distractors must be plausible, not throwaway answers
3. Balance which option is correct across the set
{flags}
SCHEMA:
{schema}

CONTEXT:
{context}
{chunks}
JSON OUTPUT:"#,
        count = count,
        flags = flag_lines(config),
        schema = schema_block("mcq", true),
        context = context,
        chunks = chunk_excerpts(content),
    )
}

fn build_true_false_prompt(content: &ProcessedContent, config: &QuizConfig, count: usize) -> String {
    let mut context = String::from("RELATIONSHIPS IN THE MATERIAL:\n");
    for rel in content.relationships.iter().take(12) {
        context.push_str(&format!(
            "- {} {} {} [{}] (evidence: {})\n",
            rel.subject,
            rel.predicate,
            rel.object,
            rel.kind.as_str(),
            rel.evidence
        ));
    }

    format!(
        r#"Generate {count} true/false questions about the material below.

INSTRUCTIONS:
1. Write non-obvious statements that require analysis, not recall of a single word
2. Mix true and false statements roughly evenly
3. False statements must be plausible misreadings of a real relationship
{flags}
SCHEMA:
{schema}

CONTEXT:
{context}
{chunks}
JSON OUTPUT:"#,
        count = count,
        flags = flag_lines(config),
        schema = schema_block("true_false", false),
        context = context,
        chunks = chunk_excerpts(content),
    )
}

fn build_fill_blank_prompt(content: &ProcessedContent, config: &QuizConfig, count: usize) -> String {
    let mut context = String::from("KEY TERMS:\n");
    for term in content.metadata.key_terms.iter().take(FILL_BLANK_KEY_TERMS) {
        context.push_str(&format!("- {term}\n"));
    }

    context.push_str("\nCENTRAL ENTITIES:\n");
    for entity in content
        .entities
        .iter()
        .filter(|e| e.importance >= SHORT_ANSWER_IMPORTANCE_FLOOR)
        .take(10)
    {
        context.push_str(&format!("- {}: {}\n", entity.text, entity.context));
    }

    format!(
        r#"Generate {count} fill-in-the-blank questions about the material below.

INSTRUCTIONS:
1. Each sentence carries enough context that exactly one term fits the blank
2. Mark the blank with _____
3. The correct_answer is the blanked term
{flags}
SCHEMA:
{schema}

CONTEXT:
{context}
{chunks}
JSON OUTPUT:"#,
        count = count,
        flags = flag_lines(config),
        schema = schema_block("fill_blank", false),
        context = context,
        chunks = chunk_excerpts(content),
    )
}

fn build_matching_prompt(content: &ProcessedContent, config: &QuizConfig, count: usize) -> String {
    let mut context = String::from("CONCEPTS:\n");
    for concept in content.concepts.iter().take(8) {
        context.push_str(&format!(
            "- {}: {} (related: {})\n",
            concept.name,
            concept.description,
            concept.related_terms.join(", ")
        ));
    }

    context.push_str("\nRELATIONSHIPS:\n");
    for rel in content.relationships.iter().take(8) {
        context.push_str(&format!(
            "- {} {} {}\n",
            rel.subject, rel.predicate, rel.object
        ));
    }

    format!(
        r#"Generate {count} matching questions about the material below.

INSTRUCTIONS:
1. Each question pairs 4-6 terms with their definitions
2. Put the terms in "options" as "term :: definition" pairs
3. The correct_answer lists the matched pairs in order
{flags}
SCHEMA:
{schema}

CONTEXT:
{context}
{chunks}
JSON OUTPUT:"#,
        count = count,
        flags = flag_lines(config),
        schema = schema_block("matching", true),
        context = context,
        chunks = chunk_excerpts(content),
    )
}

fn build_short_answer_prompt(
    content: &ProcessedContent,
    config: &QuizConfig,
    count: usize,
) -> String {
    let mut context = String::from("CORE CONCEPTS:\n");
    for concept in content
        .concepts
        .iter()
        .filter(|c| c.importance >= SHORT_ANSWER_IMPORTANCE_FLOOR)
        .take(6)
    {
        context.push_str(&format!(
            "- {}: {} (related: {})\n",
            concept.name,
            concept.description,
            concept.related_terms.join(", ")
        ));
    }

    format!(
        r#"Generate {count} short answer questions about the material below.

INSTRUCTIONS:
1. Ask for application or analysis, not definitions
2. The correct_answer is a model answer in 1-3 sentences
3. The explanation says what a grader should look for
{flags}
SCHEMA:
{schema}

CONTEXT:
{context}
{chunks}
JSON OUTPUT:"#,
        count = count,
        flags = flag_lines(config),
        schema = schema_block("short_answer", false),
        context = context,
        chunks = chunk_excerpts(content),
    )
}

/// The fixed reply schema every type-specific prompt requests.
fn schema_block(type_label: &str, with_options: bool) -> String {
    let options_line = if with_options {
        "\"options\": [\"...\", \"...\", \"...\", \"...\"], "
    } else {
        ""
    };

    format!(
        r#"{{
  "questions": [
    {{"id": "q1", "type": "{type_label}", "question": "...", {options_line}"correct_answer": "...", "explanation": "...", "difficulty": "beginner|intermediate|advanced|expert", "topic": "...", "professionalScenario": null, "metadata": {{"cross_topic": false, "requires_analysis": true, "answer_distribution": null}}}}
  ]
}}
Output ONLY the JSON object, no markdown, no explanations."#
    )
}

/// Config flags become extra instruction lines.
fn flag_lines(config: &QuizConfig) -> String {
    let mut lines = String::new();

    match config.difficulty {
        crate::schema::QuizDifficulty::Mixed => {
            lines.push_str("4. Vary difficulty across the set, from beginner to expert\n");
        }
        fixed => {
            lines.push_str(&format!("4. Target difficulty: {}\n", fixed.as_str()));
        }
    }
    if config.certification_level {
        lines.push_str(
            "5. Write board-exam style questions: precise stems, defensible single answers\n",
        );
    }
    if config.professional_scenarios {
        lines.push_str(
            "6. Frame questions inside realistic workplace scenarios and fill professionalScenario\n",
        );
    }
    if config.cross_topic_integration {
        lines.push_str(
            "7. Where the material allows, combine topics in one question and set metadata.cross_topic\n",
        );
    }

    lines
}

/// A couple of chunk excerpts ground the prompt in the actual wording.
fn chunk_excerpts(content: &ProcessedContent) -> String {
    let mut section = String::from("\nSOURCE EXCERPTS:\n");
    for chunk in content.chunks.iter().take(3) {
        section.push_str(&format!("[{}] {}\n", chunk.topic, chunk.content));
    }
    section
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::QuizDifficulty;
    use content::schema::{
        Concept, ContentMetadata, Difficulty, Entity, EntityType, SemanticChunk,
    };

    fn sample_content() -> ProcessedContent {
        ProcessedContent {
            document_id: "doc".to_string(),
            raw_text: String::new(),
            cleaned_text: "The mitochondria is the powerhouse of the cell.".to_string(),
            entities: vec![
                Entity {
                    text: "Mitochondria".to_string(),
                    entity_type: EntityType::Concept,
                    context: "powerhouse of the cell".to_string(),
                    importance: 9,
                },
                Entity {
                    text: "Footnote".to_string(),
                    entity_type: EntityType::Term,
                    context: String::new(),
                    importance: 2,
                },
            ],
            concepts: vec![Concept {
                name: "Cellular respiration".to_string(),
                description: "How cells release energy.".to_string(),
                related_terms: vec!["ATP".to_string()],
                importance: 8,
            }],
            relationships: vec![],
            chunks: vec![SemanticChunk {
                id: "c1".to_string(),
                content: "The mitochondria is the powerhouse of the cell.".to_string(),
                topic: "Cell biology".to_string(),
                start_offset: 0,
                end_offset: 47,
                concepts: vec![],
            }],
            metadata: ContentMetadata {
                word_count: 8,
                reading_level: "undergraduate".to_string(),
                topics: vec!["Cell biology".to_string()],
                key_terms: vec!["mitochondria".to_string(), "ATP".to_string()],
                difficulty: Difficulty::Intermediate,
            },
        }
    }

    fn config() -> QuizConfig {
        QuizConfig {
            question_count: 4,
            difficulty: QuizDifficulty::Intermediate,
            question_types: vec![QuestionType::Mcq],
            time_limit_secs: None,
            professional_scenarios: false,
            certification_level: false,
            cross_topic_integration: false,
        }
    }

    #[test]
    fn test_mcq_prompt_filters_low_importance_entities() {
        let prompt = build_mcq_prompt(&sample_content(), &config(), 2);

        assert!(prompt.contains("Generate 2 multiple choice questions"));
        assert!(prompt.contains("Mitochondria"));
        assert!(!prompt.contains("Footnote"), "importance 2 is below the floor");
    }

    #[test]
    fn test_certification_flag_changes_wording() {
        let mut cfg = config();
        cfg.certification_level = true;

        let prompt = build_mcq_prompt(&sample_content(), &cfg, 2);
        assert!(prompt.contains("board-exam"));
    }

    #[test]
    fn test_every_type_builds_a_prompt() {
        let content = sample_content();
        let cfg = config();

        for question_type in [
            QuestionType::Mcq,
            QuestionType::TrueFalse,
            QuestionType::FillBlank,
            QuestionType::Matching,
            QuestionType::ShortAnswer,
        ] {
            let prompt = build_prompt(question_type, &content, &cfg, 3);
            assert!(prompt.contains("Generate 3"));
            assert!(prompt.contains(question_type.as_str()));
            assert!(prompt.contains("JSON OUTPUT:"));
        }
    }
}
