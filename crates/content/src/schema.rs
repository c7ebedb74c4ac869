use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A named thing pulled out of the source text. Owned by the
/// [`ProcessedContent`] that produced it; never persisted on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub context: String,
    /// 1 (incidental) to 10 (central to the material).
    pub importance: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Person,
    Organization,
    Location,
    Date,
    Concept,
    Term,
}

impl EntityType {
    /// Map a free-text label from the generation service onto the closed
    /// enum. Unknown labels land on `Term`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "person" => Self::Person,
            "organization" => Self::Organization,
            "location" => Self::Location,
            "date" => Self::Date,
            "concept" => Self::Concept,
            _ => Self::Term,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Organization => "organization",
            Self::Location => "location",
            Self::Date => "date",
            Self::Concept => "concept",
            Self::Term => "term",
        }
    }
}

/// A higher-level idea the material teaches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Concept {
    pub name: String,
    pub description: String,
    pub related_terms: Vec<String>,
    pub importance: u8,
}

/// A directed subject-predicate-object link between two text labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    pub subject: String,
    pub predicate: String,
    pub object: String,
    /// Supporting sentence quoted from the source.
    pub evidence: String,
    pub kind: RelationKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    Causal,
    Hierarchical,
    Temporal,
    Definitional,
}

impl RelationKind {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "causal" => Self::Causal,
            "hierarchical" => Self::Hierarchical,
            "temporal" => Self::Temporal,
            _ => Self::Definitional,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Causal => "causal",
            Self::Hierarchical => "hierarchical",
            Self::Temporal => "temporal",
            Self::Definitional => "definitional",
        }
    }
}

/// A topic-tagged contiguous span of the cleaned source text.
///
/// Chunk offsets are monotonically non-decreasing and together cover the
/// cleaned text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticChunk {
    pub id: String,
    pub content: String,
    pub topic: String,
    pub start_offset: usize,
    pub end_offset: usize,
    /// Names of the concepts this span touches.
    pub concepts: Vec<String>,
}

impl SemanticChunk {
    /// Stable content-derived chunk id.
    pub fn stable_id(document_id: &str, content: &str, offsets: (usize, usize)) -> String {
        let mut hasher = Sha256::new();
        hasher.update(document_id.as_bytes());
        hasher.update(content.as_bytes());
        hasher.update(offsets.0.to_string().as_bytes());
        hasher.update(offsets.1.to_string().as_bytes());
        let result = hasher.finalize();
        hex::encode(&result[..16])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Difficulty {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "beginner" => Self::Beginner,
            "advanced" => Self::Advanced,
            "expert" => Self::Expert,
            _ => Self::Intermediate,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Expert => "expert",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentMetadata {
    pub word_count: usize,
    pub reading_level: String,
    pub topics: Vec<String>,
    pub key_terms: Vec<String>,
    pub difficulty: Difficulty,
}

/// Aggregate produced by one `process_document` run. Immutable after
/// construction; question generation only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedContent {
    pub document_id: String,
    pub raw_text: String,
    pub cleaned_text: String,
    pub entities: Vec<Entity>,
    pub concepts: Vec<Concept>,
    pub relationships: Vec<Relationship>,
    pub chunks: Vec<SemanticChunk>,
    pub metadata: ContentMetadata,
}
