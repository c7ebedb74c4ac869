use crate::schema::Entity;

/// Analysis prompts carry at most this much source text; longer documents
/// are represented by their head, which carries the framing material.
const EXCERPT_CHARS: usize = 6000;

pub fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub fn build_analysis_prompt(text: &str) -> String {
    format!(
        r#"Analyze the following study material.

INSTRUCTIONS:
1. Identify named entities (people, organizations, locations, dates, concepts, terms)
2. Identify the higher-level concepts the material teaches
3. List the main topics and the most important key terms
4. Judge the reading level and overall difficulty
5. Output ONLY valid JSON, nothing else

SCHEMA:
{{
  "entities": [
    {{"text": "EntityName", "type": "person|organization|location|date|concept|term", "context": "surrounding phrase", "importance": 7}}
  ],
  "concepts": [
    {{"name": "ConceptName", "description": "one sentence", "related_terms": ["term1", "term2"], "importance": 8}}
  ],
  "topics": ["Topic1", "Topic2"],
  "key_terms": ["term1", "term2"],
  "reading_level": "high school|undergraduate|graduate",
  "difficulty": "beginner|intermediate|advanced|expert"
}}

RULES:
- importance is an integer from 1 (incidental) to 10 (central)
- Extract at most 15 entities and 10 concepts
- Output ONLY the JSON object, no markdown, no explanations

TEXT:
{}

JSON OUTPUT:"#,
        excerpt(text, EXCERPT_CHARS)
    )
}

pub fn build_relationship_prompt(text: &str, entities: &[Entity]) -> String {
    let mut entity_list = String::new();
    for entity in entities.iter().take(15) {
        entity_list.push_str(&format!(
            "- {} ({})\n",
            entity.text,
            entity.entity_type.as_str()
        ));
    }

    format!(
        r#"Extract relationships between the listed entities from the text.

ENTITIES:
{}
SCHEMA:
{{
  "relationships": [
    {{"subject": "EntityA", "predicate": "produces", "object": "EntityB", "evidence": "quote from text", "kind": "causal|hierarchical|temporal|definitional"}}
  ]
}}

RULES:
- subject and object must come from the entity list above
- evidence must be a direct quote from the text
- kind must be one of: causal, hierarchical, temporal, definitional
- Extract 2-8 relationships
- Output ONLY the JSON object, no markdown, no explanations

TEXT:
{}

JSON OUTPUT:"#,
        entity_list,
        excerpt(text, EXCERPT_CHARS)
    )
}
