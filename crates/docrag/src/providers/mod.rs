//! Provider abstractions for embeddings, generation, and vector storage
//!
//! The pipeline treats its external collaborators as opaque functions
//! behind these traits, so concrete backends can be swapped and test
//! doubles injected.

pub mod backend;
pub mod embedding;
pub mod llm;
pub mod memory;
pub mod ollama;
pub mod supabase;

pub use backend::StoreBackend;
pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use memory::MemoryStore;
pub use ollama::{OllamaClient, OllamaEmbedder, OllamaLlm};
pub use supabase::SupabaseStore;
