//! Response types for ingestion and query operations

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::document::Chunk;

/// Maximum preview length for a cited source, in characters
const PREVIEW_CHARS: usize = 200;

/// A citeable source returned with an answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRef {
    /// Source path of the originating document
    pub source: String,
    /// Leading excerpt of the chunk text
    pub content_preview: String,
}

impl SourceRef {
    /// Build a source reference from a retrieved chunk
    pub fn from_chunk(chunk: &Chunk) -> Self {
        let source = chunk
            .metadata
            .get("source")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown")
            .to_string();

        Self {
            source,
            content_preview: preview(&chunk.text, PREVIEW_CHARS),
        }
    }
}

/// Truncate text to `max_chars`, breaking at a word boundary when possible
fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let end = text
        .char_indices()
        .nth(max_chars)
        .map(|(i, _)| i)
        .unwrap_or(text.len());

    match text[..end].rfind(' ') {
        Some(pos) if pos > 0 => format!("{}...", &text[..pos]),
        _ => format!("{}...", &text[..end]),
    }
}

/// Answer to a question, always structured (never a raw error)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResponse {
    /// Generated answer, or the fixed fallback
    pub answer: String,
    /// One entry per retrieved chunk
    pub sources: Vec<SourceRef>,
    /// True when retrieval or generation failed and the fallback was used
    #[serde(default)]
    pub error: bool,
}

impl AnswerResponse {
    /// Successful answer with sources
    pub fn answered(answer: String, sources: Vec<SourceRef>) -> Self {
        Self {
            answer,
            sources,
            error: false,
        }
    }

    /// Fallback for an empty retrieval result
    pub fn fallback(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            sources: Vec::new(),
            error: false,
        }
    }

    /// Fallback produced because retrieval or generation failed
    pub fn failed(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            sources: Vec::new(),
            error: true,
        }
    }
}

/// Report from a batch insert
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InsertReport {
    /// Records persisted successfully
    pub succeeded: usize,
    /// Chunk ids that failed to persist
    pub failed_chunk_ids: Vec<Uuid>,
}

impl InsertReport {
    /// Record a successful insert
    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    /// Record a failed insert
    pub fn record_failure(&mut self, chunk_id: Uuid) {
        self.failed_chunk_ids.push(chunk_id);
    }
}

/// Summary of one ingestion run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestSummary {
    /// Files discovered in the source
    pub files_listed: usize,
    /// Files that failed to fetch or extract
    pub files_failed: usize,
    /// Chunks produced by the chunker
    pub chunks_found: usize,
    /// Chunks persisted to the store
    pub chunks_stored: usize,
    /// Chunks that failed to persist
    pub chunks_failed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_keeps_short_text_intact() {
        assert_eq!(preview("short text", 200), "short text");
    }

    #[test]
    fn preview_truncates_at_word_boundary() {
        let text = "word ".repeat(100);
        let p = preview(&text, 200);
        assert!(p.ends_with("..."));
        assert!(p.len() <= 204);
        assert!(!p.trim_end_matches("...").ends_with("wor"));
    }

    #[test]
    fn preview_handles_multibyte_text() {
        let text = "знание ".repeat(60);
        let p = preview(&text, 200);
        assert!(p.ends_with("..."));
        assert!(p.chars().count() <= 203);
    }
}
