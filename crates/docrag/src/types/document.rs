//! Document and chunk types with provenance tracking

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Where a document came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Local filesystem walk
    Local,
    /// Cloud drive folder
    Drive,
    /// Object-storage bucket
    Bucket,
}

impl SourceKind {
    /// Default `storage_type` tag applied when the caller supplies none
    pub fn default_storage_tag(&self) -> &'static str {
        match self {
            Self::Local => "Local",
            Self::Drive => "GoogleDrive",
            Self::Bucket => "BucketStorage",
        }
    }
}

/// Provenance of an ingested document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provenance {
    /// Full path or object id in the originating source
    pub source_path: String,
    /// Display name (usually the file name)
    pub display_name: String,
    /// Originating source kind
    pub source_kind: SourceKind,
    /// Lowercased file extension without the dot
    pub extension: String,
}

impl Provenance {
    /// Build provenance from an explicit path/id and display name
    ///
    /// The extension is derived from the display name, since object ids
    /// (drive files) carry no extension of their own.
    pub fn new(
        source_path: impl Into<String>,
        display_name: impl Into<String>,
        source_kind: SourceKind,
    ) -> Self {
        let display_name = display_name.into();
        let extension = display_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();

        Self {
            source_path: source_path.into(),
            display_name,
            source_kind,
            extension,
        }
    }

    /// Build provenance from a source path, deriving name and extension
    pub fn from_path(source_path: impl Into<String>, source_kind: SourceKind) -> Self {
        let source_path = source_path.into();
        let display_name = source_path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&source_path)
            .to_string();
        Self::new(source_path.clone(), display_name, source_kind)
    }
}

/// A normalized text unit extracted from a source file
///
/// A multi-page or multi-sheet file yields one `Document` per extracted
/// segment, all sharing the same `document_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Identity of the originating source file
    pub document_id: Uuid,
    /// Extracted text of this segment
    pub text: String,
    /// Where the segment came from
    pub provenance: Provenance,
}

impl Document {
    /// Create a document segment under an existing file identity
    pub fn new(document_id: Uuid, text: String, provenance: Provenance) -> Self {
        Self {
            document_id,
            text,
            provenance,
        }
    }
}

/// Position of a chunk within its document
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkPosition {
    /// 0-based index within the document
    pub index: usize,
    /// Total chunk count for the document
    pub total: usize,
}

/// A bounded slice of a document's text, the unit of embedding and retrieval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique chunk ID
    pub chunk_id: Uuid,
    /// Back-reference to the owning document
    pub document_id: Uuid,
    /// Chunk text
    pub text: String,
    /// Position within the document
    pub position: ChunkPosition,
    /// Attribute metadata attached by the enricher
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Chunk {
    /// Create a new chunk for a document
    pub fn new(document_id: Uuid, text: String, index: usize, total: usize) -> Self {
        Self {
            chunk_id: Uuid::new_v4(),
            document_id,
            text,
            position: ChunkPosition { index, total },
            metadata: HashMap::new(),
        }
    }
}

/// Persisted record, one per chunk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRecord {
    /// Record id (the chunk id)
    pub id: Uuid,
    /// Chunk text
    pub content: String,
    /// Attribute metadata
    pub metadata: HashMap<String, serde_json::Value>,
    /// Embedding vector, fixed-length per embedding model
    pub embedding: Vec<f32>,
}

/// A record returned from a nearest-neighbor query
#[derive(Debug, Clone)]
pub struct ScoredRecord {
    /// Chunk text
    pub content: String,
    /// Attribute metadata
    pub metadata: HashMap<String, serde_json::Value>,
    /// Similarity score, higher is more similar
    pub score: f32,
}

/// Registry entry for an ingested source file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// Document identity
    pub document_id: Uuid,
    /// Display name of the source file
    pub display_name: String,
    /// Originating source kind
    pub source_kind: SourceKind,
    /// Chunks stored for this document
    pub total_chunks: usize,
    /// Ingestion timestamp
    pub ingested_at: chrono::DateTime<chrono::Utc>,
}
