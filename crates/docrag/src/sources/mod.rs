//! Source adapters for multi-source ingestion
//!
//! Each source exposes the same two capabilities, list and fetch, so the
//! ingestion worker never branches on where a file lives.

mod bucket;
mod drive;
mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::SourceKind;

pub use bucket::BucketSource;
pub use drive::DriveSource;
pub use local::LocalSource;

/// A file discovered in a source, prior to fetching
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path or object id used to fetch the payload
    pub path: String,
    /// Display name of the file
    pub name: String,
}

/// Uniform access to a document source
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// List files available in the source
    async fn list(&self) -> Result<Vec<SourceFile>>;

    /// Fetch the raw bytes of one file
    async fn fetch(&self, file: &SourceFile) -> Result<Vec<u8>>;

    /// Which kind of source this is
    fn kind(&self) -> SourceKind;
}
