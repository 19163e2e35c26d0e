//! Text-to-vector embedding providers.
//!
//! The vector store never depends on which inference mechanism produced the
//! numbers; it only sees the [`EmbeddingProvider`] contract.

mod engine;
mod onnx;

use async_trait::async_trait;

use crate::errors::Result;

pub use engine::EmbeddingEngine;
pub use onnx::OnnxEmbeddingProvider;

/// A dense vector embedding.
pub type Embedding = Vec<f32>;

/// Default HuggingFace model used by [`OnnxEmbeddingProvider`].
pub const DEFAULT_EMBEDDING_MODEL: &str = "Xenova/all-MiniLM-L6-v2";

/// Embedding dimensions of the default model.
pub const EMBEDDING_DIMS: usize = 384;

/// Produces fixed-length vectors from text.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed `text` into a vector of exactly [`EmbeddingProvider::dimensions`] entries.
    ///
    /// Empty input is valid and still yields a full-length vector.
    async fn get_embedding(&self, text: &str) -> Result<Embedding>;

    /// Length of every vector returned by [`EmbeddingProvider::get_embedding`].
    fn dimensions(&self) -> usize;

    /// Identifier of the underlying model.
    fn model_id(&self) -> &str;
}
