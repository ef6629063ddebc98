//! Application state for the docrag server

use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{RagConfig, StoreBackendKind};
use crate::error::Result;
use crate::ingestion::{Chunker, ContentExtractor, FileExtractor};
use crate::processing::IngestWorker;
use crate::providers::{
    LlmProvider, MemoryStore, OllamaClient, OllamaEmbedder, OllamaLlm, StoreBackend, SupabaseStore,
};
use crate::retrieval::AnswerEngine;
use crate::store::VectorStoreGateway;
use crate::types::DocumentInfo;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: RagConfig,
    gateway: Arc<VectorStoreGateway>,
    engine: AnswerEngine,
    extractor: Arc<dyn ContentExtractor>,
    chunker: Chunker,
    documents: DashMap<Uuid, DocumentInfo>,
}

impl AppState {
    /// Wire providers and pipeline components from configuration
    pub fn new(config: RagConfig) -> Result<Self> {
        config.validate()?;

        let ollama = Arc::new(OllamaClient::new(&config.llm)?);
        let embedder = Arc::new(OllamaEmbedder::new(
            Arc::clone(&ollama),
            config.embeddings.dimensions,
        ));
        let llm: Arc<dyn LlmProvider> = Arc::new(OllamaLlm::new(
            ollama,
            config.llm.generate_model.clone(),
        ));

        let backend: Arc<dyn StoreBackend> = match config.store.backend {
            StoreBackendKind::Supabase => Arc::new(SupabaseStore::new(&config.store)?),
            StoreBackendKind::Memory => Arc::new(MemoryStore::new()),
        };
        tracing::info!("Vector store backend: {}", backend.name());

        let gateway = Arc::new(VectorStoreGateway::new(embedder, backend));
        let engine = AnswerEngine::new(Arc::clone(&gateway), llm, config.retrieval_k());
        let chunker = Chunker::new(config.chunking.chunk_size, config.chunking.chunk_overlap)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                gateway,
                engine,
                extractor: Arc::new(FileExtractor::new()),
                chunker,
                documents: DashMap::new(),
            }),
        })
    }

    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    pub fn engine(&self) -> &AnswerEngine {
        &self.inner.engine
    }

    /// Build an ingestion worker over the shared gateway
    pub fn worker(&self) -> IngestWorker {
        IngestWorker::new(
            Arc::clone(&self.inner.extractor),
            self.inner.chunker.clone(),
            Arc::clone(&self.inner.gateway),
            &self.inner.config.processing,
        )
    }

    /// Record ingested files in the registry
    pub fn register_documents(&self, documents: Vec<DocumentInfo>) {
        for doc in documents {
            self.inner.documents.insert(doc.document_id, doc);
        }
    }

    /// List all ingested files
    pub fn list_documents(&self) -> Vec<DocumentInfo> {
        self.inner
            .documents
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }
}
