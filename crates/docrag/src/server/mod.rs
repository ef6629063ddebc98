//! HTTP server wiring

pub mod routes;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::Result;

pub use state::AppState;

/// Build the application router
pub fn router(state: AppState) -> Router {
    let enable_cors = state.config().server.enable_cors;

    let mut router = Router::new()
        .route("/health", get(health))
        .route("/api/ingest/local", post(routes::ingest::ingest_local))
        .route("/api/ingest/drive", post(routes::ingest::ingest_drive))
        .route("/api/ingest/bucket", post(routes::ingest::ingest_bucket))
        .route("/api/query", post(routes::query::query))
        .route("/api/documents", get(routes::documents::list_documents))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        router = router.layer(CorsLayer::permissive());
    }

    router
}

/// Bind and serve until shutdown
pub async fn serve(state: AppState) -> Result<()> {
    let addr = format!(
        "{}:{}",
        state.config().server.host,
        state.config().server.port
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("docrag server listening on {}", addr);

    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn health() -> &'static str {
    "ok"
}
