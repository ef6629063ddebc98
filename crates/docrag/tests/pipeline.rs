//! End-to-end pipeline test: ingest a directory, then ask questions
//! against the indexed chunks over the in-memory backend.

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use docrag::config::ProcessingConfig;
use docrag::ingestion::{Chunker, FileExtractor};
use docrag::processing::{CancelFlag, IngestWorker};
use docrag::providers::{EmbeddingProvider, LlmProvider, MemoryStore, StoreBackend};
use docrag::retrieval::{AnswerEngine, FALLBACK_ANSWER};
use docrag::sources::LocalSource;
use docrag::store::VectorStoreGateway;
use docrag::Result;

/// Deterministic embedder: direction derived from text bytes
struct StubEmbedder;

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let sum: u64 = text.bytes().map(u64::from).sum();
        Ok(vec![(sum % 101) as f32 + 1.0, (text.len() % 53) as f32 + 1.0])
    }

    fn dimensions(&self) -> usize {
        2
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// Generation double that records how often it was invoked
struct CountingLlm {
    calls: AtomicUsize,
}

#[async_trait]
impl LlmProvider for CountingLlm {
    async fn generate(&self, _question: &str, context: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("Grounded answer from {} bytes of context.", context.len()))
    }

    fn name(&self) -> &str {
        "counting"
    }

    fn model(&self) -> &str {
        "test"
    }
}

fn pipeline(backend: Arc<MemoryStore>) -> (IngestWorker, Arc<VectorStoreGateway>) {
    let gateway = Arc::new(VectorStoreGateway::new(Arc::new(StubEmbedder), backend));
    let worker = IngestWorker::new(
        Arc::new(FileExtractor::new()),
        Chunker::new(1000, 200).unwrap(),
        Arc::clone(&gateway),
        &ProcessingConfig::default(),
    );
    (worker, gateway)
}

#[tokio::test]
async fn ingest_2500_char_document_produces_three_chunks() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("long.txt"), "x".repeat(2500)).unwrap();

    let backend = Arc::new(MemoryStore::new());
    let (worker, _gateway) = pipeline(backend.clone());

    let run = worker
        .run(
            Arc::new(LocalSource::new(dir.path())),
            &HashMap::new(),
            &CancelFlag::new(),
        )
        .await
        .unwrap();

    assert_eq!(run.summary.files_listed, 1);
    assert_eq!(run.summary.chunks_found, 3);
    assert_eq!(run.summary.chunks_stored, 3);
    assert_eq!(run.summary.chunks_failed, 0);

    // Every stored chunk reports the same total and a dense index
    let results = backend
        .query_nearest(
            &[1.0, 1.0],
            &HashMap::from([("type".to_string(), json!("upload_file"))]),
            10,
        )
        .await
        .unwrap();
    assert_eq!(results.len(), 3);

    let mut indices: Vec<u64> = results
        .iter()
        .map(|r| r.metadata["chunk_index"].as_u64().unwrap())
        .collect();
    indices.sort_unstable();
    assert_eq!(indices, vec![0, 1, 2]);
    for r in &results {
        assert_eq!(r.metadata["total_chunks"], json!(3));
        assert_eq!(r.metadata["type"], json!("upload_file"));
        assert_eq!(r.metadata["tenant_id"], json!("localhost"));
        assert_eq!(r.metadata["storage_type"], json!("Local"));
    }
}

#[tokio::test]
async fn ask_returns_grounded_answer_with_sources() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("budget.txt"),
        "Project A has an approved budget of 1.2M for this fiscal year.",
    )
    .unwrap();

    let backend = Arc::new(MemoryStore::new());
    let (worker, gateway) = pipeline(backend);
    worker
        .run(
            Arc::new(LocalSource::new(dir.path())),
            &HashMap::new(),
            &CancelFlag::new(),
        )
        .await
        .unwrap();

    let llm = Arc::new(CountingLlm {
        calls: AtomicUsize::new(0),
    });
    let engine = AnswerEngine::new(gateway, llm.clone(), 5);

    let response = engine.ask("What is the budget for Project A?", None).await;

    assert!(!response.error);
    assert!(response.answer.starts_with("Grounded answer"));
    assert_eq!(response.sources.len(), 1);
    assert!(response.sources[0].source.ends_with("budget.txt"));
    assert!(response.sources[0]
        .content_preview
        .contains("approved budget"));
    assert_eq!(llm.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unmatched_filter_falls_back_without_generation() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("note.txt"), "locally stored note").unwrap();

    let backend = Arc::new(MemoryStore::new());
    let (worker, gateway) = pipeline(backend);
    worker
        .run(
            Arc::new(LocalSource::new(dir.path())),
            &HashMap::new(),
            &CancelFlag::new(),
        )
        .await
        .unwrap();

    let llm = Arc::new(CountingLlm {
        calls: AtomicUsize::new(0),
    });
    let engine = AnswerEngine::new(gateway, llm.clone(), 5);

    // Chunks are tagged storage_type=Local; this filter matches nothing
    let filter = HashMap::from([("storage_type".to_string(), json!("GoogleDrive"))]);
    let response = engine.ask("What is in the note?", Some(&filter)).await;

    assert_eq!(response.answer, FALLBACK_ANSWER);
    assert!(response.sources.is_empty());
    assert!(!response.error);
    assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
}
