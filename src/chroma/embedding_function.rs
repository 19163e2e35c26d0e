//! Embedding functions let a collection embed documents and query texts itself.
//!
//! A collection records the name of its embedding function in its
//! configuration. When a collection is attached without an explicit function,
//! the function is rebuilt from that name through the process-wide registry.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use async_trait::async_trait;
use tracing::debug;

use crate::embedding::{Embedding, EmbeddingProvider};
use crate::errors::{Error, Result};

/// Name under which [`ProviderEmbeddingFunction`] is registered.
pub const PROVIDER_EMBEDDING_FUNCTION: &str = "memoria-ef";

/// Builds an embedding function from the configuration stored with a collection.
pub type EmbeddingFunctionFactory = fn(&serde_json::Value) -> Arc<dyn EmbeddingFunction>;

/// Turns texts into vectors on behalf of a collection.
#[async_trait]
pub trait EmbeddingFunction: Send + Sync {
    /// Registry name, persisted in the collection configuration.
    fn name(&self) -> &str;

    /// One embedding per input text, in order.
    async fn generate(&self, texts: &[String]) -> Result<Vec<Embedding>>;

    /// Configuration persisted alongside the name.
    fn config(&self) -> serde_json::Value {
        serde_json::json!({})
    }
}

/// Adapter exposing an [`EmbeddingProvider`] as a collection embedding function.
#[derive(Clone, Default)]
pub struct ProviderEmbeddingFunction {
    provider: Option<Arc<dyn EmbeddingProvider>>,
}

impl ProviderEmbeddingFunction {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// Rebuild from stored configuration. The result has no provider and
    /// fails on use until one is supplied.
    pub fn build_from_config(_config: &serde_json::Value) -> Arc<dyn EmbeddingFunction> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl EmbeddingFunction for ProviderEmbeddingFunction {
    fn name(&self) -> &str {
        PROVIDER_EMBEDDING_FUNCTION
    }

    async fn generate(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        let provider = self.provider.as_ref().ok_or(Error::ProviderNotConfigured)?;

        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(provider.get_embedding(text).await?);
        }
        Ok(embeddings)
    }
}

fn registry() -> &'static RwLock<HashMap<String, EmbeddingFunctionFactory>> {
    static REGISTRY: OnceLock<RwLock<HashMap<String, EmbeddingFunctionFactory>>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Register a named embedding function factory for the whole process.
///
/// Returns `false` and keeps the existing entry when `name` is already registered.
pub fn register_embedding_function(name: &str, factory: EmbeddingFunctionFactory) -> bool {
    let mut registry = match registry().write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if registry.contains_key(name) {
        debug!(name, "embedding function already registered");
        return false;
    }
    registry.insert(name.to_string(), factory);
    debug!(name, "registered embedding function");
    true
}

/// Whether `name` has been registered.
pub fn is_registered(name: &str) -> bool {
    match registry().read() {
        Ok(registry) => registry.contains_key(name),
        Err(poisoned) => poisoned.into_inner().contains_key(name),
    }
}

/// Build a registered embedding function, or `None` for unknown names.
pub fn build_embedding_function(
    name: &str,
    config: &serde_json::Value,
) -> Option<Arc<dyn EmbeddingFunction>> {
    let factory = match registry().read() {
        Ok(registry) => registry.get(name).copied(),
        Err(poisoned) => poisoned.into_inner().get(name).copied(),
    }?;
    Some(factory(config))
}
