//! Async embedding provider backed by a lazily loaded [`EmbeddingEngine`].

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::engine::EmbeddingEngine;
use super::{DEFAULT_EMBEDDING_MODEL, EMBEDDING_DIMS, Embedding, EmbeddingProvider};
use crate::errors::{Error, Result};

/// Local ONNX embedding provider.
///
/// The model is downloaded and loaded on the first call to
/// [`EmbeddingProvider::get_embedding`]. Concurrent first callers wait on the
/// same load; a failed load leaves the provider unloaded so a later call retries.
pub struct OnnxEmbeddingProvider {
    model_id: String,
    dimensions: usize,
    cache_dir: Option<PathBuf>,
    engine: OnceCell<Arc<Mutex<EmbeddingEngine>>>,
}

impl OnnxEmbeddingProvider {
    pub fn new(model_id: impl Into<String>, dimensions: usize) -> Self {
        Self {
            model_id: model_id.into(),
            dimensions,
            cache_dir: None,
            engine: OnceCell::new(),
        }
    }

    /// Store downloaded model files under `dir` instead of the HF default cache.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Whether the model has been loaded yet.
    pub fn is_loaded(&self) -> bool {
        self.engine.initialized()
    }

    async fn engine(&self) -> Result<Arc<Mutex<EmbeddingEngine>>> {
        let engine = self
            .engine
            .get_or_try_init(|| async {
                info!(model = %self.model_id, "loading embedding model");
                let model_id = self.model_id.clone();
                let dimensions = self.dimensions;
                let cache_dir = self.cache_dir.clone();
                let engine = tokio::task::spawn_blocking(move || {
                    EmbeddingEngine::new(&model_id, dimensions, cache_dir.as_deref())
                })
                .await??;
                Ok::<_, Error>(Arc::new(Mutex::new(engine)))
            })
            .await?;
        Ok(Arc::clone(engine))
    }
}

impl Default for OnnxEmbeddingProvider {
    fn default() -> Self {
        Self::new(DEFAULT_EMBEDDING_MODEL, EMBEDDING_DIMS)
    }
}

#[async_trait]
impl EmbeddingProvider for OnnxEmbeddingProvider {
    async fn get_embedding(&self, text: &str) -> Result<Embedding> {
        let engine = self.engine().await?;
        let text = text.to_string();
        debug!(chars = text.len(), "embedding text");

        tokio::task::spawn_blocking(move || {
            let mut engine = engine
                .lock()
                .map_err(|_| Error::Inference("embedding engine lock poisoned".to_string()))?;
            engine.embed(&text)
        })
        .await?
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_provider_configuration() {
        let provider = OnnxEmbeddingProvider::default();

        assert_eq!(provider.model_id(), "Xenova/all-MiniLM-L6-v2");
        assert_eq!(provider.dimensions(), 384);
        assert!(!provider.is_loaded());
    }

    #[test]
    fn test_dimensions_do_not_require_loading() {
        let provider = OnnxEmbeddingProvider::new("some/model", 768).with_cache_dir("/tmp/models");

        assert_eq!(provider.dimensions(), 768);
        assert!(!provider.is_loaded());
    }

    #[tokio::test]
    async fn test_failed_load_leaves_provider_unloaded() {
        let provider = OnnxEmbeddingProvider::new("some/model", 0);

        let result = provider.get_embedding("hello").await;

        assert!(matches!(result, Err(Error::Config(_))));
        assert!(!provider.is_loaded());
    }

    #[ignore]
    #[tokio::test]
    async fn test_integration_embedding_length_matches_dimensions() {
        let provider = OnnxEmbeddingProvider::default();

        for text in ["", "   ", "the sky is blue"] {
            let embedding = provider.get_embedding(text).await.expect("embed text");
            assert_eq!(embedding.len(), provider.dimensions());
        }
        assert!(provider.is_loaded());
    }

    #[ignore]
    #[tokio::test]
    async fn test_integration_concurrent_first_use_loads_once() {
        let provider = Arc::new(OnnxEmbeddingProvider::default());

        let a = tokio::spawn({
            let provider = Arc::clone(&provider);
            async move { provider.get_embedding("first").await }
        });
        let b = tokio::spawn({
            let provider = Arc::clone(&provider);
            async move { provider.get_embedding("second").await }
        });

        assert_eq!(a.await.expect("join").expect("embed").len(), 384);
        assert_eq!(b.await.expect("join").expect("embed").len(), 384);
    }
}
