//! Document ingestion: extraction, normalization, and chunking

mod chunker;
mod extractor;
mod normalizer;

pub use chunker::Chunker;
pub use extractor::{ContentExtractor, FileExtractor, FileKind};
pub use normalizer::{ExtractionOutcome, Normalizer};
