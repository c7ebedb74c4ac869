use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Mcq,
    TrueFalse,
    FillBlank,
    Matching,
    ShortAnswer,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mcq => "mcq",
            Self::TrueFalse => "true_false",
            Self::FillBlank => "fill_blank",
            Self::Matching => "matching",
            Self::ShortAnswer => "short_answer",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "mcq" | "multiple_choice" => Some(Self::Mcq),
            "true_false" => Some(Self::TrueFalse),
            "fill_blank" => Some(Self::FillBlank),
            "matching" => Some(Self::Matching),
            "short_answer" => Some(Self::ShortAnswer),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizDifficulty {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
    Mixed,
}

impl QuizDifficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Expert => "expert",
            Self::Mixed => "mixed",
        }
    }
}

/// Caller-supplied generation parameters. Immutable input; the generator
/// never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizConfig {
    pub question_count: usize,
    pub difficulty: QuizDifficulty,
    /// Non-empty, ordered; balancing walks this order.
    pub question_types: Vec<QuestionType>,
    #[serde(default)]
    pub time_limit_secs: Option<u32>,
    #[serde(default)]
    pub professional_scenarios: bool,
    #[serde(default)]
    pub certification_level: bool,
    #[serde(default)]
    pub cross_topic_integration: bool,
}

impl QuizConfig {
    /// Per-type generation target: `ceil(question_count / types)`.
    pub fn per_type_target(&self) -> usize {
        self.question_count.div_ceil(self.question_types.len().max(1))
    }
}

/// A correct answer is a single string for most types, a list for
/// matching questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Single(String),
    Multiple(Vec<String>),
}

impl Answer {
    pub fn as_single(&self) -> Option<&str> {
        match self {
            Self::Single(s) => Some(s),
            Self::Multiple(_) => None,
        }
    }

    /// Coerce a loosely-typed reply value into an answer. Booleans and
    /// numbers become their string form; null and objects are rejected.
    fn from_value(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) if !s.trim().is_empty() => {
                Some(Self::Single(s.trim().to_string()))
            }
            serde_json::Value::Bool(b) => Some(Self::Single(b.to_string())),
            serde_json::Value::Number(n) => Some(Self::Single(n.to_string())),
            serde_json::Value::Array(items) => {
                let parts: Vec<String> = items
                    .iter()
                    .filter_map(|v| v.as_str())
                    .map(|s| s.to_string())
                    .collect();
                if parts.is_empty() {
                    None
                } else {
                    Some(Self::Multiple(parts))
                }
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionMetadata {
    #[serde(default)]
    pub cross_topic: bool,
    #[serde(default)]
    pub requires_analysis: bool,
    /// Option letter the correct MCQ answer was rotated onto, once
    /// answer-distribution balancing has run.
    #[serde(default)]
    pub answer_distribution: Option<String>,
}

/// The terminal artifact handed to the persistence collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvancedQuizQuestion {
    pub id: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub question: String,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    pub correct_answer: Answer,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub professional_scenario: Option<String>,
    #[serde(default)]
    pub time_limit_secs: Option<u32>,
    #[serde(default)]
    pub metadata: QuestionMetadata,
}

/// Wire shape of a question batch reply.
#[derive(Debug, Default, Deserialize)]
pub struct QuestionBatchReply {
    #[serde(default)]
    pub questions: Vec<QuestionReply>,
}

#[derive(Debug, Deserialize)]
pub struct QuestionReply {
    /// Model-supplied ids collide across batches; they are discarded and
    /// re-stamped.
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub question_type: String,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub correct_answer: serde_json::Value,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub topic: String,
    #[serde(
        default,
        rename = "professionalScenario",
        alias = "professional_scenario"
    )]
    pub professional_scenario: Option<String>,
    #[serde(default)]
    pub metadata: MetadataReply,
}

#[derive(Debug, Default, Deserialize)]
pub struct MetadataReply {
    #[serde(default)]
    pub cross_topic: bool,
    #[serde(default)]
    pub requires_analysis: bool,
    #[serde(default)]
    pub answer_distribution: Option<String>,
}

impl QuestionReply {
    fn into_question(self, question_type: QuestionType, config: &QuizConfig) -> Option<AdvancedQuizQuestion> {
        if self.question.trim().is_empty() {
            return None;
        }
        let correct_answer = Answer::from_value(&self.correct_answer)?;

        let difficulty = if self.difficulty.trim().is_empty() {
            config.difficulty.as_str().to_string()
        } else {
            self.difficulty.trim().to_lowercase()
        };

        Some(AdvancedQuizQuestion {
            id: format!("{}-{}", question_type.as_str(), Uuid::new_v4()),
            question_type,
            question: self.question.trim().to_string(),
            options: self.options,
            correct_answer,
            explanation: self.explanation,
            difficulty,
            topic: self.topic,
            professional_scenario: self.professional_scenario,
            time_limit_secs: config.time_limit_secs,
            metadata: QuestionMetadata {
                cross_topic: self.metadata.cross_topic,
                requires_analysis: self.metadata.requires_analysis,
                answer_distribution: self.metadata.answer_distribution,
            },
        })
    }
}

impl QuestionBatchReply {
    /// Convert a batch generated for one specific type. The model
    /// occasionally mislabels questions, so the requested type wins.
    pub fn into_questions(
        self,
        question_type: QuestionType,
        config: &QuizConfig,
    ) -> Vec<AdvancedQuizQuestion> {
        self.questions
            .into_iter()
            .filter_map(|q| q.into_question(question_type, config))
            .collect()
    }

    /// Convert a mixed batch (fallback path): each question keeps its own
    /// type label when that type was requested, otherwise it is coerced
    /// to the first requested type.
    pub fn into_questions_coerced(self, config: &QuizConfig) -> Vec<AdvancedQuizQuestion> {
        let Some(first) = config.question_types.first().copied() else {
            return Vec::new();
        };

        self.questions
            .into_iter()
            .filter_map(|q| {
                let question_type = QuestionType::from_label(&q.question_type)
                    .filter(|t| config.question_types.contains(t))
                    .unwrap_or(first);
                q.into_question(question_type, config)
            })
            .collect()
    }
}
