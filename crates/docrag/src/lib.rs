//! docrag: document ingestion, vector indexing, and grounded answers
//!
//! Ingests documents from the local filesystem, a cloud drive, or an
//! object-storage bucket, normalizes them into overlapping identity-tagged
//! chunks, embeds them into a vector store, and answers questions from the
//! retrieved context with citeable sources.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod metadata;
pub mod processing;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod sources;
pub mod store;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use types::{
    AnswerResponse, Chunk, Document, IngestSummary, InsertReport, Provenance, SourceKind,
    StoredRecord,
};
