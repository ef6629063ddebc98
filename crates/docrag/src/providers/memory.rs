//! In-memory store backend for development and tests
//!
//! Brute-force cosine similarity over records held in memory. Not meant
//! for production corpora; useful wherever the REST backend would be a
//! test burden.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::error::Result;
use crate::types::{ScoredRecord, StoredRecord};

use super::backend::StoreBackend;

/// In-process vector store
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<StoredRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a record with this id is present
    pub fn contains(&self, id: &uuid::Uuid) -> bool {
        self.records.read().iter().any(|r| r.id == *id)
    }

    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() {
            return 0.0;
        }

        let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        dot / (norm_a * norm_b)
    }

    /// Exact-match AND semantics across all filter keys
    fn matches_filter(
        metadata: &HashMap<String, serde_json::Value>,
        filter: &HashMap<String, serde_json::Value>,
    ) -> bool {
        filter
            .iter()
            .all(|(key, value)| metadata.get(key) == Some(value))
    }
}

#[async_trait]
impl StoreBackend for MemoryStore {
    async fn insert(&self, record: &StoredRecord) -> Result<()> {
        self.records.write().push(record.clone());
        Ok(())
    }

    async fn query_nearest(
        &self,
        vector: &[f32],
        filter: &HashMap<String, serde_json::Value>,
        k: usize,
    ) -> Result<Vec<ScoredRecord>> {
        let records = self.records.read();

        let mut scored: Vec<ScoredRecord> = records
            .iter()
            .filter(|r| Self::matches_filter(&r.metadata, filter))
            .map(|r| ScoredRecord {
                content: r.content.clone(),
                metadata: r.metadata.clone(),
                score: Self::cosine_similarity(vector, &r.embedding),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);

        Ok(scored)
    }

    fn name(&self) -> &str {
        "memory"
    }
}
