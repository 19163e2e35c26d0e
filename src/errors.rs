//! Error types for memoria.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for memoria operations.
#[derive(Error, Debug)]
pub enum Error {
    /// An embedding function was asked to embed before a provider was supplied.
    #[error("Embedding provider not configured for embedding function")]
    ProviderNotConfigured,

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// ONNX inference error.
    #[error("Inference error: {0}")]
    Inference(String),

    /// Tokenization error.
    #[error("Tokenization error: {0}")]
    Tokenization(#[from] tokenizers::Error),

    /// ONNX session error.
    #[error("ONNX session error: {0}")]
    Onnx(#[from] ort::Error),

    /// HuggingFace Hub error.
    #[error("HuggingFace Hub error: {0}")]
    HfHub(#[from] hf_hub::api::sync::ApiError),

    /// A blocking inference task panicked or was cancelled.
    #[error("Background task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    /// The vector database answered with a non-success status.
    #[error("Vector database error ({status}): {message}")]
    Database { status: u16, message: String },

    /// Transport-level failure talking to the vector database.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Input exceeds the maximum accepted length.
    #[error("Input too long: {actual_length} bytes (max {max_length})")]
    InputTooLong {
        max_length: usize,
        actual_length: usize,
    },
}
