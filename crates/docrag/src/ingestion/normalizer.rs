//! Normalization of extracted segments into identified documents

use uuid::Uuid;

use crate::error::Result;
use crate::types::{Document, Provenance};

/// Extraction result for one source file, prior to normalization
#[derive(Debug)]
pub struct ExtractionOutcome {
    /// Where the file came from
    pub provenance: Provenance,
    /// Extracted segments, or the per-file failure
    pub result: Result<Vec<String>>,
}

/// Wraps extraction output into the canonical document representation
///
/// Pure data transformation; performs no I/O.
#[derive(Debug, Clone, Default)]
pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalize per-file extraction outcomes into documents
    ///
    /// Each file receives one fresh document id, shared by every segment
    /// extracted from it. Files whose extraction failed are logged and
    /// skipped; this is the only place unsupported or broken files are
    /// silently dropped from the batch.
    pub fn normalize(&self, outcomes: Vec<ExtractionOutcome>) -> Vec<Document> {
        let mut documents = Vec::new();

        for outcome in outcomes {
            let segments = match outcome.result {
                Ok(segments) => segments,
                Err(e) => {
                    tracing::warn!(
                        "Skipping '{}': {}",
                        outcome.provenance.display_name,
                        e
                    );
                    continue;
                }
            };

            let document_id = Uuid::new_v4();
            for segment in segments {
                documents.push(Document::new(
                    document_id,
                    segment,
                    outcome.provenance.clone(),
                ));
            }
        }

        documents
    }
}
