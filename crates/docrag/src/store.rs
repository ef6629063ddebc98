//! Vector store gateway: embedding plus persistence in one seam

use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::providers::{EmbeddingProvider, StoreBackend};
use crate::types::{Chunk, ChunkPosition, InsertReport, ScoredRecord, StoredRecord};

/// A retrieved chunk with its similarity score
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    /// The retrieved chunk, rebuilt from stored content and metadata
    pub chunk: Chunk,
    /// Similarity score, higher is more similar
    pub score: f32,
}

/// Write and read path over the embedding provider and store backend
///
/// No caching: two identical queries re-embed and re-query the backend.
pub struct VectorStoreGateway {
    embedder: Arc<dyn EmbeddingProvider>,
    backend: Arc<dyn StoreBackend>,
}

impl VectorStoreGateway {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, backend: Arc<dyn StoreBackend>) -> Self {
        Self { embedder, backend }
    }

    /// Embed and persist a batch of chunks
    ///
    /// All texts are embedded in one batch call; an embedding failure is
    /// fatal for the whole batch since no record can be built without its
    /// vector. Insertion is per-record independent: a failed insert is
    /// logged, counted, and does not abort the rest.
    pub async fn insert_batch(&self, chunks: &[Chunk]) -> Result<InsertReport> {
        let mut report = InsertReport::default();

        // Empty payloads never reach the embedding provider
        let mut embeddable: Vec<&Chunk> = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            if chunk.text.trim().is_empty() {
                tracing::warn!("Rejecting empty chunk {} before embedding", chunk.chunk_id);
                report.record_failure(chunk.chunk_id);
            } else {
                embeddable.push(chunk);
            }
        }

        if embeddable.is_empty() {
            return Ok(report);
        }

        let texts: Vec<String> = embeddable.iter().map(|c| c.text.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        if embeddings.len() != embeddable.len() {
            return Err(Error::Embedding(format!(
                "expected {} embeddings, got {}",
                embeddable.len(),
                embeddings.len()
            )));
        }

        for (chunk, embedding) in embeddable.iter().zip(embeddings) {
            let record = StoredRecord {
                id: chunk.chunk_id,
                content: chunk.text.clone(),
                metadata: chunk.metadata.clone(),
                embedding,
            };

            match self.backend.insert(&record).await {
                Ok(()) => report.record_success(),
                Err(e) => {
                    tracing::warn!("Failed to insert chunk {}: {}", chunk.chunk_id, e);
                    report.record_failure(chunk.chunk_id);
                }
            }
        }

        tracing::info!(
            "Inserted {}/{} chunks into {}",
            report.succeeded,
            chunks.len(),
            self.backend.name()
        );

        Ok(report)
    }

    /// Embed the query and run a filtered nearest-neighbor search
    ///
    /// Returns up to `k` chunks ordered by descending similarity; an empty
    /// store or a filter with no matches yields an empty result, not an
    /// error.
    pub async fn similarity_search(
        &self,
        query_text: &str,
        filter: &HashMap<String, serde_json::Value>,
        k: usize,
    ) -> Result<Vec<ScoredChunk>> {
        let vector = self.embedder.embed(query_text).await?;
        let rows = self.backend.query_nearest(&vector, filter, k).await?;

        Ok(rows.into_iter().map(record_to_chunk).collect())
    }
}

/// Rebuild a chunk from a stored record's content and metadata
fn record_to_chunk(record: ScoredRecord) -> ScoredChunk {
    let meta = &record.metadata;

    let chunk_id = meta
        .get("chunk_id")
        .and_then(|v| v.as_str())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);

    let document_id = meta
        .get("document_id")
        .and_then(|v| v.as_str())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);

    let index = meta
        .get("chunk_index")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as usize;

    let total = meta
        .get("total_chunks")
        .and_then(|v| v.as_u64())
        .unwrap_or(1) as usize;

    ScoredChunk {
        chunk: Chunk {
            chunk_id,
            document_id,
            text: record.content,
            position: ChunkPosition { index, total },
            metadata: record.metadata,
        },
        score: record.score,
    }
}
