//! Configuration for the docrag pipeline

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Main pipeline configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Embedding configuration
    #[serde(default)]
    pub embeddings: EmbeddingConfig,
    /// LLM configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Vector store backend configuration
    #[serde(default)]
    pub store: StoreConfig,
    /// Remote source configuration
    #[serde(default)]
    pub sources: SourcesConfig,
    /// Ingestion worker configuration
    #[serde(default)]
    pub processing: ProcessingConfig,
}

impl RagConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate settings that would break the pipeline
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(Error::Config("chunk_size must be greater than zero".into()));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(Error::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        if self.retrieval_k() == 0 {
            return Err(Error::Config("store.top_k must be greater than zero".into()));
        }
        Ok(())
    }

    /// Number of results requested per similarity search
    pub fn retrieval_k(&self) -> usize {
        self.store.top_k
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8001,
            enable_cors: true,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Embedding dimensions (768 for nomic-embed-text)
    pub dimensions: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self { dimensions: 768 }
    }
}

/// LLM (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Embedding model name
    pub embed_model: String,
    /// Generation model name
    pub generate_model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            embed_model: "nomic-embed-text".to_string(),
            generate_model: "phi3".to_string(),
            temperature: 0.0,
            timeout_secs: 120,
            max_retries: 2,
        }
    }
}

/// Vector store backend selection
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackendKind {
    /// Supabase-compatible REST backend (PostgREST + match_documents RPC)
    #[default]
    Supabase,
    /// In-process brute-force store for development and tests
    Memory,
}

/// Vector store backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend implementation
    #[serde(default)]
    pub backend: StoreBackendKind,
    /// Base URL of the REST backend
    pub base_url: String,
    /// Service key for the REST backend
    pub service_key: String,
    /// Table holding stored records
    pub table: String,
    /// RPC function performing the nearest-neighbor query
    pub query_fn: String,
    /// Results per similarity search
    pub top_k: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackendKind::default(),
            base_url: "http://localhost:54321".to_string(),
            service_key: String::new(),
            table: "documents".to_string(),
            query_fn: "match_documents".to_string(),
            top_k: 5,
        }
    }
}

/// Remote source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Drive API base URL (overridable for tests)
    #[serde(default = "default_drive_api_base")]
    pub drive_api_base: String,
    /// Object-storage base URL
    #[serde(default)]
    pub bucket_base_url: String,
    /// Object-storage service key
    #[serde(default)]
    pub bucket_service_key: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            drive_api_base: default_drive_api_base(),
            bucket_base_url: String::new(),
            bucket_service_key: String::new(),
        }
    }
}

fn default_drive_api_base() -> String {
    "https://www.googleapis.com/drive/v3".to_string()
}

/// Ingestion worker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Number of files fetched and extracted concurrently
    pub parallel_files: Option<usize>,
    /// Timeout for fetching and extracting a single file, in seconds
    pub file_timeout_secs: u64,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            parallel_files: None,
            file_timeout_secs: 120,
        }
    }
}
