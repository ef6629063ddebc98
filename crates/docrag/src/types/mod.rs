//! Core data types

pub mod document;
pub mod query;
pub mod response;

pub use document::{
    Chunk, ChunkPosition, Document, DocumentInfo, Provenance, ScoredRecord, SourceKind,
    StoredRecord,
};
pub use query::QueryRequest;
pub use response::{AnswerResponse, IngestSummary, InsertReport, SourceRef};
