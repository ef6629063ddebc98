//! Vector store backend trait

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::Result;
use crate::types::{ScoredRecord, StoredRecord};

/// Trait for the persistent vector store
///
/// The store is append-only from the pipeline's point of view: records are
/// inserted once and queried by vector similarity constrained to an
/// exact-match metadata filter (AND semantics across keys).
///
/// Implementations:
/// - `SupabaseStore`: PostgREST insert + `match_documents` RPC query
/// - `MemoryStore`: in-process brute-force cosine store for tests
#[async_trait]
pub trait StoreBackend: Send + Sync {
    /// Persist one record
    async fn insert(&self, record: &StoredRecord) -> Result<()>;

    /// Nearest-neighbor query constrained by a metadata filter
    ///
    /// Returns up to `k` records ordered by descending similarity; an
    /// empty result is not an error.
    async fn query_nearest(
        &self,
        vector: &[f32],
        filter: &HashMap<String, serde_json::Value>,
        k: usize,
    ) -> Result<Vec<ScoredRecord>>;

    /// Backend name for logging
    fn name(&self) -> &str;
}
