pub mod chunker;
pub mod clean;
pub mod prompt;
pub mod schema;

pub use chunker::{ChunkerConfig, SentenceChunker};
pub use clean::TextCleaner;
pub use schema::{
    Concept, ContentMetadata, Difficulty, Entity, EntityType, ProcessedContent, RelationKind,
    Relationship, SemanticChunk,
};

use std::sync::Arc;

use serde::Deserialize;
use textgen::{GenerationError, TextGenerator, json};
use tracing::warn;
use unicode_segmentation::UnicodeSegmentation;

fn default_importance() -> u8 {
    5
}

/// Wire shape of the single-prompt document analysis. Fields default
/// aggressively because the upstream output is best-effort JSON.
#[derive(Debug, Default, Deserialize)]
struct AnalysisReply {
    #[serde(default)]
    entities: Vec<EntityReply>,
    #[serde(default)]
    concepts: Vec<ConceptReply>,
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    key_terms: Vec<String>,
    #[serde(default)]
    reading_level: String,
    #[serde(default)]
    difficulty: String,
}

impl AnalysisReply {
    /// Degenerate analysis used whenever the analyze step fails: the
    /// pipeline still produces a ProcessedContent.
    fn degenerate() -> Self {
        Self {
            topics: vec!["General".to_string()],
            reading_level: "intermediate".to_string(),
            difficulty: "intermediate".to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Deserialize)]
struct EntityReply {
    #[serde(default)]
    text: String,
    #[serde(rename = "type", default)]
    entity_type: String,
    #[serde(default)]
    context: String,
    #[serde(default = "default_importance")]
    importance: u8,
}

#[derive(Debug, Deserialize)]
struct ConceptReply {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    related_terms: Vec<String>,
    #[serde(default = "default_importance")]
    importance: u8,
}

#[derive(Debug, Default, Deserialize)]
struct RelationshipReply {
    #[serde(default)]
    relationships: Vec<TripleReply>,
}

#[derive(Debug, Deserialize)]
struct TripleReply {
    #[serde(default)]
    subject: String,
    #[serde(default)]
    predicate: String,
    #[serde(default)]
    object: String,
    #[serde(default)]
    evidence: String,
    #[serde(default)]
    kind: String,
}

/// Turns raw document text into a [`ProcessedContent`] aggregate by
/// cleaning, analyzing, chunking, and extracting relationships.
///
/// Analyze and relationship failures degrade to defaults with a warning;
/// only a fatal service error escapes.
pub struct ContentProcessor {
    client: Arc<dyn TextGenerator>,
    cleaner: TextCleaner,
    chunker: SentenceChunker,
}

impl ContentProcessor {
    pub fn new(client: Arc<dyn TextGenerator>) -> Self {
        Self::with_chunker(client, SentenceChunker::new(ChunkerConfig::default()))
    }

    pub fn with_chunker(client: Arc<dyn TextGenerator>, chunker: SentenceChunker) -> Self {
        Self {
            client,
            cleaner: TextCleaner::new(),
            chunker,
        }
    }

    pub async fn process_document(
        &self,
        document_id: &str,
        raw_text: &str,
    ) -> Result<ProcessedContent, GenerationError> {
        // Step 1: normalize the raw text
        let cleaned = self.cleaner.clean(raw_text);

        // Step 2: single-prompt analysis (degrades to defaults on failure)
        let analysis = self.analyze(document_id, &cleaned).await?;

        let entities: Vec<Entity> = analysis
            .entities
            .iter()
            .filter(|e| !e.text.trim().is_empty())
            .map(|e| Entity {
                text: e.text.trim().to_string(),
                entity_type: EntityType::from_label(&e.entity_type),
                context: e.context.clone(),
                importance: e.importance.clamp(1, 10),
            })
            .collect();

        let concepts: Vec<Concept> = analysis
            .concepts
            .iter()
            .filter(|c| !c.name.trim().is_empty())
            .map(|c| Concept {
                name: c.name.trim().to_string(),
                description: c.description.clone(),
                related_terms: c.related_terms.clone(),
                importance: c.importance.clamp(1, 10),
            })
            .collect();

        let metadata = ContentMetadata {
            word_count: cleaned.unicode_words().count(),
            reading_level: if analysis.reading_level.is_empty() {
                "intermediate".to_string()
            } else {
                analysis.reading_level.clone()
            },
            topics: analysis.topics.clone(),
            key_terms: analysis.key_terms.clone(),
            difficulty: Difficulty::from_label(&analysis.difficulty),
        };

        // Step 3: sentence chunking with round-robin topic assignment
        let chunks = self
            .chunker
            .chunk(document_id, &cleaned, &metadata.topics, &concepts);

        // Step 4: entity-anchored relationship extraction
        let relationships = if entities.is_empty() {
            Vec::new()
        } else {
            self.extract_relationships(document_id, &cleaned, &entities)
                .await?
        };

        Ok(ProcessedContent {
            document_id: document_id.to_string(),
            raw_text: raw_text.to_string(),
            cleaned_text: cleaned,
            entities,
            concepts,
            relationships,
            chunks,
            metadata,
        })
    }

    async fn analyze(
        &self,
        document_id: &str,
        cleaned: &str,
    ) -> Result<AnalysisReply, GenerationError> {
        let prompt = prompt::build_analysis_prompt(cleaned);

        let reply = match self.client.generate(&prompt).await {
            Ok(reply) => reply,
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                warn!(document_id, error = %err, "analysis request failed, using defaults");
                return Ok(AnalysisReply::degenerate());
            }
        };

        match json::parse_object::<AnalysisReply>(&reply) {
            Ok(analysis) => Ok(analysis),
            Err(err) => {
                warn!(document_id, error = %err, "unparseable analysis reply, using defaults");
                Ok(AnalysisReply::degenerate())
            }
        }
    }

    async fn extract_relationships(
        &self,
        document_id: &str,
        cleaned: &str,
        entities: &[Entity],
    ) -> Result<Vec<Relationship>, GenerationError> {
        let prompt = prompt::build_relationship_prompt(cleaned, entities);

        let reply = match self.client.generate(&prompt).await {
            Ok(reply) => reply,
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                warn!(document_id, error = %err, "relationship request failed, skipping");
                return Ok(Vec::new());
            }
        };

        let parsed = match json::parse_object::<RelationshipReply>(&reply) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(document_id, error = %err, "unparseable relationship reply, skipping");
                return Ok(Vec::new());
            }
        };

        Ok(parsed
            .relationships
            .into_iter()
            .filter(|t| !t.subject.trim().is_empty() && !t.object.trim().is_empty())
            .map(|t| Relationship {
                subject: t.subject.trim().to_string(),
                predicate: t.predicate.trim().to_string(),
                object: t.object.trim().to_string(),
                evidence: t.evidence,
                kind: RelationKind::from_label(&t.kind),
            })
            .collect())
    }
}
