//! Ingestion endpoints, one per source kind

use axum::{extract::State, Json};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Result;
use crate::processing::CancelFlag;
use crate::server::state::AppState;
use crate::sources::{BucketSource, DocumentSource, DriveSource, LocalSource};
use crate::types::query::{IngestBucketRequest, IngestDriveRequest, IngestLocalRequest};
use crate::types::IngestSummary;

/// POST /api/ingest/local - ingest a local directory
pub async fn ingest_local(
    State(state): State<AppState>,
    Json(request): Json<IngestLocalRequest>,
) -> Result<Json<IngestSummary>> {
    tracing::info!("Ingesting local directory: {}", request.input_dir);

    let source = Arc::new(LocalSource::new(&request.input_dir));
    run_ingest(&state, source, request.storage_type).await
}

/// POST /api/ingest/drive - ingest a cloud drive folder
pub async fn ingest_drive(
    State(state): State<AppState>,
    Json(request): Json<IngestDriveRequest>,
) -> Result<Json<IngestSummary>> {
    tracing::info!("Ingesting drive folder: {}", request.folder_id);

    let source = Arc::new(DriveSource::new(
        &state.config().sources.drive_api_base,
        &request.access_token,
        &request.folder_id,
    ));
    run_ingest(&state, source, request.storage_type).await
}

/// POST /api/ingest/bucket - ingest an object-storage bucket
pub async fn ingest_bucket(
    State(state): State<AppState>,
    Json(request): Json<IngestBucketRequest>,
) -> Result<Json<IngestSummary>> {
    tracing::info!("Ingesting bucket: {}", request.bucket);

    let sources = &state.config().sources;
    let source = Arc::new(BucketSource::new(
        &sources.bucket_base_url,
        &sources.bucket_service_key,
        &request.bucket,
        request.prefix,
    ));
    run_ingest(&state, source, request.storage_type).await
}

async fn run_ingest(
    state: &AppState,
    source: Arc<dyn DocumentSource>,
    storage_type: Option<String>,
) -> Result<Json<IngestSummary>> {
    let mut tags = HashMap::new();
    if let Some(storage_type) = storage_type {
        tags.insert("storage_type".to_string(), json!(storage_type));
    }

    let run = state
        .worker()
        .run(source, &tags, &CancelFlag::new())
        .await?;
    state.register_documents(run.documents);

    Ok(Json(run.summary))
}
