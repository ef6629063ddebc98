//! docrag server binary
//!
//! Run with: cargo run -p docrag --bin docrag-server

use docrag::config::RagConfig;
use docrag::providers::OllamaClient;
use docrag::server::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docrag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Optional config file, defaults otherwise
    let config = match std::env::args().nth(1) {
        Some(path) => RagConfig::load(&path)?,
        None => RagConfig::default(),
    };

    tracing::info!("Configuration loaded");
    tracing::info!("  - Store backend: {:?}", config.store.backend);
    tracing::info!("  - Embedding model: {}", config.llm.embed_model);
    tracing::info!("  - LLM model: {}", config.llm.generate_model);
    tracing::info!(
        "  - Chunking: size {}, overlap {}",
        config.chunking.chunk_size,
        config.chunking.chunk_overlap
    );

    let ollama = OllamaClient::new(&config.llm)?;
    if ollama.health_check().await {
        tracing::info!("Ollama is running at {}", config.llm.base_url);
    } else {
        tracing::warn!("Ollama not available at {}", config.llm.base_url);
        tracing::warn!("Start it with `ollama serve`, then pull the models:");
        tracing::warn!(
            "  ollama pull {} && ollama pull {}",
            config.llm.embed_model,
            config.llm.generate_model
        );
    }

    let state = AppState::new(config)?;
    docrag::server::serve(state).await?;

    Ok(())
}
