use crate::schema::{Concept, SemanticChunk};

const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

#[derive(Debug, Clone)]
pub struct ChunkerConfig {
    /// Sentences accumulated per chunk before flushing.
    pub sentences_per_chunk: usize,
    /// A trailing remainder below this merges into the previous chunk
    /// instead of forming a tiny chunk of its own.
    pub min_tail_sentences: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            sentences_per_chunk: 5,
            min_tail_sentences: 3,
        }
    }
}

/// Splits cleaned text into sentence groups and tags each group with a
/// topic, round-robining through the extracted topic list.
pub struct SentenceChunker {
    config: ChunkerConfig,
}

/// Byte span of one sentence within the cleaned text, terminator included.
#[derive(Debug, Clone, Copy)]
struct SentenceSpan {
    start: usize,
    end: usize,
}

impl SentenceChunker {
    pub fn new(config: ChunkerConfig) -> Self {
        Self { config }
    }

    pub fn chunk(
        &self,
        document_id: &str,
        text: &str,
        topics: &[String],
        concepts: &[Concept],
    ) -> Vec<SemanticChunk> {
        let sentences = split_sentence_spans(text);
        if sentences.is_empty() {
            return Vec::new();
        }

        // Group sentence spans; a short tail folds into the last group.
        let mut groups: Vec<Vec<SentenceSpan>> = Vec::new();
        for window in sentences.chunks(self.config.sentences_per_chunk) {
            groups.push(window.to_vec());
        }
        if groups.len() > 1 {
            let tail_len = groups[groups.len() - 1].len();
            if tail_len < self.config.min_tail_sentences {
                let tail = groups.pop().unwrap();
                groups.last_mut().unwrap().extend(tail);
            }
        }

        groups
            .iter()
            .enumerate()
            .map(|(i, group)| {
                let start = group[0].start;
                let end = group[group.len() - 1].end;
                let content = text[start..end].to_string();

                let topic = if topics.is_empty() {
                    "General".to_string()
                } else {
                    topics[i % topics.len()].clone()
                };

                let concepts = concepts_in(&content, concepts);

                SemanticChunk {
                    id: SemanticChunk::stable_id(document_id, &content, (start, end)),
                    content,
                    topic,
                    start_offset: start,
                    end_offset: end,
                    concepts,
                }
            })
            .collect()
    }
}

/// Split on `.`, `!`, `?` boundaries, keeping the terminator with its
/// sentence. Text after the last terminator still counts as a sentence.
fn split_sentence_spans(text: &str) -> Vec<SentenceSpan> {
    let mut spans = Vec::new();
    let mut start = 0usize;

    for (i, c) in text.char_indices() {
        if SENTENCE_TERMINATORS.contains(&c) {
            let end = i + c.len_utf8();
            if !text[start..end].trim().is_empty() {
                spans.push(SentenceSpan { start, end });
            }
            start = end;
        }
    }

    if !text[start..].trim().is_empty() {
        spans.push(SentenceSpan {
            start,
            end: text.len(),
        });
    }

    // Drop leading whitespace from each span so offsets point at the
    // first character of the sentence.
    for span in &mut spans {
        let slice = &text[span.start..span.end];
        let trimmed = slice.len() - slice.trim_start().len();
        span.start += trimmed;
    }

    spans
}

/// Names of the concepts whose name or related terms occur in the span.
fn concepts_in(content: &str, concepts: &[Concept]) -> Vec<String> {
    let haystack = content.to_lowercase();

    concepts
        .iter()
        .filter(|concept| {
            let name_hit = !concept.name.is_empty()
                && haystack.contains(&concept.name.to_lowercase());
            let term_hit = concept
                .related_terms
                .iter()
                .any(|term| !term.is_empty() && haystack.contains(&term.to_lowercase()));
            name_hit || term_hit
        })
        .map(|concept| concept.name.clone())
        .collect()
}
