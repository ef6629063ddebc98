//! Ingestion worker: bounded-concurrency fetch and extract, batch insert

use futures_util::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::timeout;

use crate::config::ProcessingConfig;
use crate::error::{Error, Result};
use crate::ingestion::{Chunker, ContentExtractor, ExtractionOutcome, Normalizer};
use crate::metadata::MetadataEnricher;
use crate::sources::{DocumentSource, SourceFile};
use crate::store::VectorStoreGateway;
use crate::types::{Chunk, DocumentInfo, IngestSummary, Provenance};

use super::CancelFlag;

/// Result of one ingestion run
#[derive(Debug, Clone)]
pub struct IngestRun {
    /// Aggregate counts for the caller
    pub summary: IngestSummary,
    /// One registry entry per ingested source file
    pub documents: Vec<DocumentInfo>,
}

/// Runs one ingestion: list, fetch+extract in parallel, chunk, enrich,
/// and persist everything in a single cross-file batch.
pub struct IngestWorker {
    extractor: Arc<dyn ContentExtractor>,
    chunker: Chunker,
    normalizer: Normalizer,
    enricher: MetadataEnricher,
    gateway: Arc<VectorStoreGateway>,
    parallel_files: usize,
    file_timeout: Duration,
}

impl IngestWorker {
    pub fn new(
        extractor: Arc<dyn ContentExtractor>,
        chunker: Chunker,
        gateway: Arc<VectorStoreGateway>,
        config: &ProcessingConfig,
    ) -> Self {
        let parallel_files = config
            .parallel_files
            .unwrap_or_else(|| num_cpus::get().min(8));

        Self {
            extractor,
            chunker,
            normalizer: Normalizer::new(),
            enricher: MetadataEnricher::new(),
            gateway,
            parallel_files,
            file_timeout: Duration::from_secs(config.file_timeout_secs),
        }
    }

    /// Ingest every file the source lists
    ///
    /// File extraction runs concurrently, bounded by the worker pool; a
    /// failure in one file is isolated into the summary. The insert is a
    /// single batch across all files. Cancellation is cooperative: the
    /// flag is checked before each file, and records already inserted are
    /// not rolled back.
    pub async fn run(
        &self,
        source: Arc<dyn DocumentSource>,
        caller_tags: &HashMap<String, serde_json::Value>,
        cancel: &CancelFlag,
    ) -> Result<IngestRun> {
        let kind = source.kind();
        let files = source.list().await?;

        let mut summary = IngestSummary {
            files_listed: files.len(),
            ..Default::default()
        };
        tracing::info!("Ingesting {} files from {:?} source", files.len(), kind);

        let semaphore = Arc::new(Semaphore::new(self.parallel_files));
        let file_futures: Vec<_> = files
            .into_iter()
            .map(|file| {
                let source = Arc::clone(&source);
                let extractor = Arc::clone(&self.extractor);
                let sem = Arc::clone(&semaphore);
                let cancel = cancel.clone();
                let file_timeout = self.file_timeout;

                async move {
                    let _permit = sem.acquire().await.unwrap();

                    if cancel.is_cancelled() {
                        tracing::info!("Cancelled before processing '{}'", file.name);
                        return None;
                    }

                    let provenance = Provenance::new(&file.path, &file.name, kind);
                    let result =
                        fetch_and_extract(&*source, &*extractor, &file, file_timeout).await;

                    Some(ExtractionOutcome { provenance, result })
                }
            })
            .collect();

        let outcomes: Vec<ExtractionOutcome> =
            join_all(file_futures).await.into_iter().flatten().collect();

        summary.files_failed = outcomes.iter().filter(|o| o.result.is_err()).count();

        let normalized = self.normalizer.normalize(outcomes);
        let (chunks, documents) = self.chunk_and_enrich(normalized, kind, caller_tags);
        summary.chunks_found = chunks.len();

        if chunks.is_empty() {
            tracing::info!("No chunks produced, nothing to insert");
            return Ok(IngestRun { summary, documents });
        }

        let report = self.gateway.insert_batch(&chunks).await?;
        summary.chunks_stored = report.succeeded;
        summary.chunks_failed += report.failed_chunk_ids.len();

        tracing::info!(
            "Ingestion complete: {} files, {} chunks stored, {} failed",
            summary.files_listed,
            summary.chunks_stored,
            summary.chunks_failed
        );

        Ok(IngestRun { summary, documents })
    }

    /// Chunk documents, renumbering positions per source file, and attach
    /// layered metadata; also builds the per-file registry entries
    fn chunk_and_enrich(
        &self,
        documents: Vec<crate::types::Document>,
        kind: crate::types::SourceKind,
        caller_tags: &HashMap<String, serde_json::Value>,
    ) -> (Vec<Chunk>, Vec<DocumentInfo>) {
        // The storage_type tag defaults per source when the caller is silent
        let mut tags = caller_tags.clone();
        tags.entry("storage_type".to_string())
            .or_insert_with(|| serde_json::Value::String(kind.default_storage_tag().to_string()));

        let mut all_chunks = Vec::new();
        let mut infos = Vec::new();
        let mut i = 0;

        // Segments of one file are adjacent and share a document id
        while i < documents.len() {
            let document_id = documents[i].document_id;
            let provenance = documents[i].provenance.clone();

            let mut file_chunks = Vec::new();
            while i < documents.len() && documents[i].document_id == document_id {
                file_chunks.extend(self.chunker.chunk(&documents[i]));
                i += 1;
            }
            Chunker::renumber(&mut file_chunks);

            infos.push(DocumentInfo {
                document_id,
                display_name: provenance.display_name.clone(),
                source_kind: kind,
                total_chunks: file_chunks.len(),
                ingested_at: chrono::Utc::now(),
            });

            all_chunks.extend(
                file_chunks
                    .into_iter()
                    .map(|chunk| self.enricher.enrich(chunk, &provenance, &tags)),
            );
        }

        (all_chunks, infos)
    }
}

/// Fetch and extract one file under the per-file timeout
async fn fetch_and_extract(
    source: &dyn DocumentSource,
    extractor: &dyn ContentExtractor,
    file: &SourceFile,
    file_timeout: Duration,
) -> Result<Vec<String>> {
    let work = async {
        let data = source.fetch(file).await?;
        let extension = file
            .name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();
        extractor.extract(&data, &extension)
    };

    match timeout(file_timeout, work).await {
        Ok(result) => result,
        Err(_) => Err(Error::extraction(
            &file.name,
            format!("timed out after {}s", file_timeout.as_secs()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::FileExtractor;
    use crate::providers::backend::StoreBackend;
    use crate::providers::{EmbeddingProvider, MemoryStore};
    use async_trait::async_trait;
    use serde_json::json;

    struct StubEmbedder;

    #[async_trait]
    impl EmbeddingProvider for StubEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            Ok(vec![text.len() as f32, 1.0])
        }

        fn dimensions(&self) -> usize {
            2
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    struct StaticSource {
        files: Vec<(String, Vec<u8>)>,
    }

    #[async_trait]
    impl DocumentSource for StaticSource {
        async fn list(&self) -> Result<Vec<SourceFile>> {
            Ok(self
                .files
                .iter()
                .map(|(name, _)| SourceFile {
                    path: format!("/virtual/{}", name),
                    name: name.clone(),
                })
                .collect())
        }

        async fn fetch(&self, file: &SourceFile) -> Result<Vec<u8>> {
            self.files
                .iter()
                .find(|(name, _)| *name == file.name)
                .map(|(_, data)| data.clone())
                .ok_or_else(|| Error::source("missing file"))
        }

        fn kind(&self) -> crate::types::SourceKind {
            crate::types::SourceKind::Local
        }
    }

    fn worker(backend: Arc<MemoryStore>) -> IngestWorker {
        let gateway = Arc::new(VectorStoreGateway::new(Arc::new(StubEmbedder), backend));
        IngestWorker::new(
            Arc::new(FileExtractor::new()),
            Chunker::new(1000, 200).unwrap(),
            gateway,
            &ProcessingConfig::default(),
        )
    }

    #[tokio::test]
    async fn ingests_text_files_and_reports_counts() {
        let backend = Arc::new(MemoryStore::new());
        let source = Arc::new(StaticSource {
            files: vec![
                ("a.txt".to_string(), b"alpha content".to_vec()),
                ("b.txt".to_string(), b"beta content".to_vec()),
            ],
        });

        let run = worker(backend.clone())
            .run(source, &HashMap::new(), &CancelFlag::new())
            .await
            .unwrap();

        assert_eq!(run.summary.files_listed, 2);
        assert_eq!(run.summary.files_failed, 0);
        assert_eq!(run.summary.chunks_found, 2);
        assert_eq!(run.summary.chunks_stored, 2);
        assert_eq!(run.summary.chunks_failed, 0);
        assert_eq!(run.documents.len(), 2);
        assert_eq!(backend.len(), 2);
    }

    #[tokio::test]
    async fn unsupported_files_are_skipped_not_fatal() {
        let backend = Arc::new(MemoryStore::new());
        let source = Arc::new(StaticSource {
            files: vec![
                ("good.txt".to_string(), b"useful text".to_vec()),
                ("binary.exe".to_string(), vec![0, 1, 2, 3]),
            ],
        });

        let run = worker(backend.clone())
            .run(source, &HashMap::new(), &CancelFlag::new())
            .await
            .unwrap();

        assert_eq!(run.summary.files_listed, 2);
        assert_eq!(run.summary.files_failed, 1);
        assert_eq!(run.summary.chunks_stored, 1);
        assert_eq!(run.documents.len(), 1);
        assert_eq!(backend.len(), 1);
    }

    #[tokio::test]
    async fn default_storage_tag_follows_source_kind() {
        let backend = Arc::new(MemoryStore::new());
        let source = Arc::new(StaticSource {
            files: vec![("a.txt".to_string(), b"tagged content".to_vec())],
        });

        worker(backend.clone())
            .run(source, &HashMap::new(), &CancelFlag::new())
            .await
            .unwrap();

        let results = backend
            .query_nearest(
                &[1.0, 1.0],
                &HashMap::from([("storage_type".to_string(), json!("Local"))]),
                5,
            )
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn cancelled_run_processes_no_files() {
        let backend = Arc::new(MemoryStore::new());
        let source = Arc::new(StaticSource {
            files: vec![("a.txt".to_string(), b"never read".to_vec())],
        });

        let cancel = CancelFlag::new();
        cancel.cancel();

        let run = worker(backend.clone())
            .run(source, &HashMap::new(), &cancel)
            .await
            .unwrap();

        assert_eq!(run.summary.files_listed, 1);
        assert_eq!(run.summary.chunks_found, 0);
        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn multi_segment_file_gets_dense_positions() {
        // An xlsx-like extractor double that yields two segments per file
        struct TwoSegmentExtractor;

        impl ContentExtractor for TwoSegmentExtractor {
            fn extract(&self, _data: &[u8], _extension: &str) -> Result<Vec<String>> {
                Ok(vec!["segment one".to_string(), "segment two".to_string()])
            }
        }

        let backend = Arc::new(MemoryStore::new());
        let gateway = Arc::new(VectorStoreGateway::new(
            Arc::new(StubEmbedder),
            backend.clone(),
        ));
        let worker = IngestWorker::new(
            Arc::new(TwoSegmentExtractor),
            Chunker::new(1000, 200).unwrap(),
            gateway,
            &ProcessingConfig::default(),
        );

        let source = Arc::new(StaticSource {
            files: vec![("book.xlsx".to_string(), b"irrelevant".to_vec())],
        });

        let run = worker
            .run(source, &HashMap::new(), &CancelFlag::new())
            .await
            .unwrap();
        assert_eq!(run.summary.chunks_stored, 2);
        assert_eq!(run.documents.len(), 1);
        assert_eq!(run.documents[0].total_chunks, 2);

        let results = backend
            .query_nearest(&[1.0, 1.0], &HashMap::new(), 5)
            .await
            .unwrap();

        let mut indices: Vec<u64> = results
            .iter()
            .map(|r| r.metadata["chunk_index"].as_u64().unwrap())
            .collect();
        indices.sort_unstable();
        assert_eq!(indices, vec![0, 1]);
        for r in &results {
            assert_eq!(r.metadata["total_chunks"], json!(2));
        }
    }
}
