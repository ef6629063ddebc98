//! Document registry endpoint

use axum::{extract::State, Json};

use crate::server::state::AppState;
use crate::types::DocumentInfo;

/// GET /api/documents - list ingested files
pub async fn list_documents(State(state): State<AppState>) -> Json<Vec<DocumentInfo>> {
    let mut documents = state.list_documents();
    documents.sort_by(|a, b| b.ingested_at.cmp(&a.ingested_at));
    Json(documents)
}
