//! Error types for the docrag pipeline

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline errors
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration (bad chunk size/overlap, missing backend settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Per-file extraction failure; the batch continues without this file
    #[error("Failed to extract '{file}': {message}")]
    Extraction { file: String, message: String },

    /// Unknown file extension
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Embedding call failed; fatal for the batch being embedded
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Per-record insert failure; counted and the batch continues
    #[error("Failed to insert record: {0}")]
    Insert(String),

    /// Vector store backend error
    #[error("Store backend error: {0}")]
    Store(String),

    /// Similarity search failure
    #[error("Retrieval failed: {0}")]
    Retrieval(String),

    /// Answer generation failure
    #[error("Generation failed: {0}")]
    Generation(String),

    /// Source adapter failure (listing or fetching a file)
    #[error("Source error: {0}")]
    Source(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Create an extraction error
    pub fn extraction(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Extraction {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    /// Create a source error
    pub fn source(message: impl Into<String>) -> Self {
        Self::Source(message.into())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            Error::Config(msg) => (StatusCode::BAD_REQUEST, "config_error", msg.clone()),
            Error::Extraction { file, message } => (
                StatusCode::BAD_REQUEST,
                "extraction_error",
                format!("Failed to extract '{}': {}", file, message),
            ),
            Error::UnsupportedFormat(ext) => (
                StatusCode::BAD_REQUEST,
                "unsupported_format",
                format!("Unsupported file format: {}", ext),
            ),
            Error::Embedding(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "embedding_error", msg.clone())
            }
            Error::Insert(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "insert_error", msg.clone())
            }
            Error::Store(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg.clone())
            }
            Error::Retrieval(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "retrieval_error", msg.clone())
            }
            Error::Generation(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "generation_error", msg.clone())
            }
            Error::Source(msg) => (StatusCode::BAD_GATEWAY, "source_error", msg.clone()),
            Error::Io(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "io_error",
                err.to_string(),
            ),
            Error::Json(err) => (StatusCode::BAD_REQUEST, "json_error", err.to_string()),
            Error::Http(err) => (StatusCode::BAD_GATEWAY, "http_error", err.to_string()),
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
