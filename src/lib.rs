//! memoria - semantic memory for AI agents.
//!
//! Text is embedded by a local ONNX model and stored in a Chroma collection
//! for similarity search. The interface is deliberately small: add, search,
//! forget and clear.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use memoria::{ChromaVectorStore, Config, Metadata, SearchOptions, VectorStore};
//!
//! # async fn run() -> memoria::Result<()> {
//! memoria::setup();
//!
//! let config = Config::load()?;
//! let provider = Arc::new(config.embedding_provider());
//! let store = ChromaVectorStore::new(provider, config.chroma_client()?, &config.collection);
//!
//! let mut metadata = Metadata::new();
//! metadata.insert("tag".to_string(), "fact".into());
//! let item = store.add("the sky is blue", metadata).await?;
//!
//! for hit in store.search("sky color", SearchOptions::with_limit(1)).await? {
//!     println!("{:.3}: {}", hit.score, hit.item.content);
//! }
//!
//! store.forget(&item.id).await?;
//! # Ok(())
//! # }
//! ```

pub mod chroma;
pub mod config;
pub mod embedding;
pub mod errors;
pub mod memory_types;
pub mod metadata;
pub mod vector;

// Re-export public API
pub use chroma::ChromaClient;
pub use config::Config;
pub use embedding::{Embedding, EmbeddingProvider, OnnxEmbeddingProvider, EMBEDDING_DIMS};
pub use errors::{Error, Result};
pub use memory_types::{MemoryItem, SearchOptions, SearchResult, SimilarityMethod};
pub use metadata::{Metadata, MetadataValue};
pub use vector::{ChromaVectorStore, MAX_INPUT_LENGTH, MAX_SEARCH_LIMIT, VectorStore};

/// Process-wide setup: registers the provider-backed embedding function so
/// collections created by this crate can be reopened by name.
///
/// Safe to call more than once; later calls are no-ops.
pub fn setup() {
    chroma::register_embedding_function(
        chroma::PROVIDER_EMBEDDING_FUNCTION,
        chroma::ProviderEmbeddingFunction::build_from_config,
    );
}
