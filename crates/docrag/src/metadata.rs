//! Chunk metadata enrichment and query-filter defaulting

use serde_json::json;
use std::collections::HashMap;

use crate::types::Chunk;

/// Record type stamped on every ingested chunk and injected into filters
/// that do not express their own `type`.
pub const DEFAULT_RECORD_TYPE: &str = "upload_file";

/// Tenant applied when the caller supplies none.
pub const DEFAULT_TENANT: &str = "localhost";

/// Metadata keys that identify a chunk and are never overwritten.
const IDENTITY_KEYS: [&str; 2] = ["document_id", "chunk_id"];

/// Applies the metadata layering rules to chunks and resolves query filters
#[derive(Debug, Clone, Default)]
pub struct MetadataEnricher;

impl MetadataEnricher {
    pub fn new() -> Self {
        Self
    }

    /// Attach layered metadata to a chunk
    ///
    /// Layers from lowest to highest precedence: system defaults,
    /// provenance fields, chunk position fields, caller tags. A later
    /// layer overwrites an earlier key, except the identity keys which
    /// keep their first value.
    pub fn enrich(
        &self,
        mut chunk: Chunk,
        provenance: &crate::types::Provenance,
        caller_tags: &HashMap<String, serde_json::Value>,
    ) -> Chunk {
        let mut metadata = HashMap::new();

        // System defaults
        metadata.insert("type".to_string(), json!(DEFAULT_RECORD_TYPE));
        metadata.insert("tenant_id".to_string(), json!(DEFAULT_TENANT));

        // Provenance
        layer(&mut metadata, "source", json!(provenance.source_path));
        layer(&mut metadata, "file_name", json!(provenance.display_name));
        layer(&mut metadata, "file_type", json!(provenance.extension));
        layer(
            &mut metadata,
            "document_id",
            json!(chunk.document_id.to_string()),
        );

        // Chunk position
        layer(&mut metadata, "chunk_id", json!(chunk.chunk_id.to_string()));
        layer(&mut metadata, "chunk_index", json!(chunk.position.index));
        layer(&mut metadata, "total_chunks", json!(chunk.position.total));

        // Caller tags win over everything except identity
        for (key, value) in caller_tags {
            layer(&mut metadata, key, value.clone());
        }

        chunk.metadata = metadata;
        chunk
    }

    /// Resolve the filter used for similarity search
    ///
    /// `None` becomes `{"type": "upload_file"}`. A filter without a `type`
    /// key gets the default injected into a copy; the caller's map is not
    /// mutated. A filter that names its own `type` passes through
    /// unchanged.
    pub fn resolve_filter(
        &self,
        caller_filter: Option<&HashMap<String, serde_json::Value>>,
    ) -> HashMap<String, serde_json::Value> {
        match caller_filter {
            None => {
                let mut filter = HashMap::new();
                filter.insert("type".to_string(), json!(DEFAULT_RECORD_TYPE));
                filter
            }
            Some(filter) if !filter.contains_key("type") => {
                let mut resolved = filter.clone();
                resolved.insert("type".to_string(), json!(DEFAULT_RECORD_TYPE));
                resolved
            }
            Some(filter) => filter.clone(),
        }
    }
}

/// Insert a metadata key, preserving identity keys once set
fn layer(metadata: &mut HashMap<String, serde_json::Value>, key: &str, value: serde_json::Value) {
    if IDENTITY_KEYS.contains(&key) && metadata.contains_key(key) {
        return;
    }
    metadata.insert(key.to_string(), value);
}
