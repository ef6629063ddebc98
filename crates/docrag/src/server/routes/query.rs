//! Query endpoint

use axum::{extract::State, Json};
use std::time::Instant;

use crate::server::state::AppState;
use crate::types::{AnswerResponse, QueryRequest};

/// POST /api/query - answer a question over the indexed corpus
pub async fn query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Json<AnswerResponse> {
    let start = Instant::now();
    tracing::info!("Query: \"{}\"", request.question);

    let filter = request.caller_filter();
    let response = state
        .engine()
        .ask(&request.question, filter.as_ref())
        .await;

    tracing::info!(
        "Query answered in {}ms with {} sources",
        start.elapsed().as_millis(),
        response.sources.len()
    );

    Json(response)
}
