//! docrag command-line interface
//!
//! Run with: cargo run -p docrag --features cli --bin docrag -- <command>

use clap::{Parser, Subcommand};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

use docrag::config::RagConfig;
use docrag::processing::CancelFlag;
use docrag::server::AppState;
use docrag::sources::{BucketSource, DriveSource, LocalSource};
use docrag::types::IngestSummary;

#[derive(Parser)]
#[command(name = "docrag", about = "Document-based RAG system", version)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest documents from a local directory
    Process {
        /// Input directory containing documents
        #[arg(long)]
        input_dir: String,
        /// Storage type tag (defaults to "Local")
        #[arg(long)]
        storage_type: Option<String>,
    },
    /// Ingest documents from a cloud drive folder
    ProcessDrive {
        /// Drive folder id
        #[arg(long)]
        folder_id: String,
        /// OAuth bearer token for the drive API
        #[arg(long)]
        access_token: String,
        /// Storage type tag (defaults to "GoogleDrive")
        #[arg(long)]
        storage_type: Option<String>,
    },
    /// Ingest documents from an object-storage bucket
    ProcessBucket {
        /// Bucket name
        #[arg(long)]
        bucket: String,
        /// Optional folder prefix within the bucket
        #[arg(long)]
        prefix: Option<String>,
        /// Storage type tag (defaults to "BucketStorage")
        #[arg(long)]
        storage_type: Option<String>,
    },
    /// Ask a question over the indexed corpus
    Query {
        /// Question to ask
        #[arg(long)]
        question: String,
        /// Filter by storage type
        #[arg(long)]
        storage_type: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docrag=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => RagConfig::load(path)?,
        None => RagConfig::default(),
    };
    let state = AppState::new(config)?;

    match cli.command {
        Command::Process {
            input_dir,
            storage_type,
        } => {
            let source = Arc::new(LocalSource::new(&input_dir));
            let summary = ingest(&state, source, storage_type).await?;
            print_summary(&summary);
        }
        Command::ProcessDrive {
            folder_id,
            access_token,
            storage_type,
        } => {
            let source = Arc::new(DriveSource::new(
                &state.config().sources.drive_api_base,
                &access_token,
                &folder_id,
            ));
            let summary = ingest(&state, source, storage_type).await?;
            print_summary(&summary);
        }
        Command::ProcessBucket {
            bucket,
            prefix,
            storage_type,
        } => {
            let sources = state.config().sources.clone();
            let source = Arc::new(BucketSource::new(
                &sources.bucket_base_url,
                &sources.bucket_service_key,
                &bucket,
                prefix,
            ));
            let summary = ingest(&state, source, storage_type).await?;
            print_summary(&summary);
        }
        Command::Query {
            question,
            storage_type,
        } => {
            let filter = storage_type.map(|storage_type| {
                HashMap::from([("storage_type".to_string(), json!(storage_type))])
            });
            let response = state.engine().ask(&question, filter.as_ref()).await;

            println!("\nAnswer: {}", response.answer);
            if !response.sources.is_empty() {
                println!("\nSources:");
                for source in &response.sources {
                    println!("\n  Source: {}", source.source);
                    println!("  Content: {}", source.content_preview);
                }
            }
        }
    }

    Ok(())
}

async fn ingest(
    state: &AppState,
    source: Arc<dyn docrag::sources::DocumentSource>,
    storage_type: Option<String>,
) -> anyhow::Result<IngestSummary> {
    let mut tags = HashMap::new();
    if let Some(storage_type) = storage_type {
        tags.insert("storage_type".to_string(), json!(storage_type));
    }

    let run = state.worker().run(source, &tags, &CancelFlag::new()).await?;
    state.register_documents(run.documents);
    Ok(run.summary)
}

fn print_summary(summary: &IngestSummary) {
    println!(
        "Processed {} files ({} failed): {} chunks found, {} stored, {} failed",
        summary.files_listed,
        summary.files_failed,
        summary.chunks_found,
        summary.chunks_stored,
        summary.chunks_failed
    );
}
