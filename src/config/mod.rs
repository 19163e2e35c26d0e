//! Configuration system for memoria.

mod env_parser;
mod loader;
mod overrides;
mod paths;
mod validation;

#[cfg(test)]
mod tests_utils;
#[cfg(test)]
use tests_utils::ENV_MUTEX;

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::chroma::{ChromaClient, DEFAULT_CHROMA_URL, DEFAULT_DATABASE, DEFAULT_TENANT};
use crate::embedding::{DEFAULT_EMBEDDING_MODEL, EMBEDDING_DIMS, OnnxEmbeddingProvider};
use crate::errors::Error;
use crate::memory_types::DEFAULT_SEARCH_LIMIT;
use crate::vector::DEFAULT_COLLECTION_NAME;

pub use loader::ConfigFile;

/// Default HTTP timeout for vector database requests.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration values with priority: defaults < config file < env vars.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the Chroma server.
    pub chroma_url: String,

    /// Chroma tenant.
    pub tenant: String,

    /// Chroma database within the tenant.
    pub database: String,

    /// Collection holding the memories.
    pub collection: String,

    /// HuggingFace embedding model identifier.
    pub embedding_model: String,

    /// Output dimensionality of the embedding model.
    pub embedding_dims: usize,

    /// Directory for caching ONNX models.
    pub model_cache: PathBuf,

    /// Default number of search results.
    pub search_limit: usize,

    /// Timeout for each request to the vector database, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        // Use home directory with sensible fallback for systems without HOME
        let home = dirs::home_dir().unwrap_or_else(|| {
            std::env::var("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("."))
        });

        Self {
            chroma_url: DEFAULT_CHROMA_URL.to_string(),
            tenant: DEFAULT_TENANT.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION_NAME.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            embedding_dims: EMBEDDING_DIMS,
            model_cache: home.join(".memoria/models"),
            search_limit: DEFAULT_SEARCH_LIMIT,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load configuration with defaults, file values, and environment overrides.
    pub fn load() -> Result<Self, Error> {
        let file_config = loader::load_from_file()?;
        Self::build(file_config)
    }

    /// Like [`Config::load`], reading the file at `path` instead of the default location.
    pub fn load_from(path: &Path) -> Result<Self, Error> {
        let file_config = loader::load_from_path(path)?;
        Self::build(Some(file_config))
    }

    fn build(file_config: Option<ConfigFile>) -> Result<Self, Error> {
        let mut config = Config::default();

        if let Some(mut file) = file_config {
            if let Some(model_cache) = file.model_cache.as_mut() {
                paths::expand_tilde(model_cache);
            }
            config.merge_from_file(file);
        }

        overrides::apply_env_overrides(&mut config)?;
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration from a file into this config.
    fn merge_from_file(&mut self, file: ConfigFile) {
        if !file.chroma_url.is_empty() {
            self.chroma_url = file.chroma_url;
        }
        if !file.tenant.is_empty() {
            self.tenant = file.tenant;
        }
        if !file.database.is_empty() {
            self.database = file.database;
        }
        if !file.collection.is_empty() {
            self.collection = file.collection;
        }
        if !file.embedding_model.is_empty() {
            self.embedding_model = file.embedding_model;
        }
        if let Some(model_cache) = file.model_cache {
            self.model_cache = model_cache;
        }
        self.embedding_dims = file.embedding_dims;
        self.search_limit = file.search_limit;
        self.request_timeout_secs = file.request_timeout_secs;
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), Error> {
        let validator = validation::ConfigValidator {
            chroma_url: self.chroma_url.clone(),
            collection: self.collection.clone(),
            embedding_model: self.embedding_model.clone(),
            embedding_dims: self.embedding_dims,
            search_limit: self.search_limit,
            request_timeout_secs: self.request_timeout_secs,
        };

        validator.validate()
    }

    /// Ensure the model cache directory exists.
    pub fn ensure_directories(&self) -> Result<(), Error> {
        if !self.model_cache.as_os_str().is_empty() {
            std::fs::create_dir_all(&self.model_cache).map_err(|e| {
                Error::Config(format!(
                    "Failed to create model cache directory {}: {e}",
                    self.model_cache.display()
                ))
            })?;
        }

        Ok(())
    }

    /// Embedding provider for the configured model, caching files under `model_cache`.
    pub fn embedding_provider(&self) -> OnnxEmbeddingProvider {
        OnnxEmbeddingProvider::new(&self.embedding_model, self.embedding_dims)
            .with_cache_dir(&self.model_cache)
    }

    /// Chroma client for the configured server, tenant and database.
    pub fn chroma_client(&self) -> Result<ChromaClient, Error> {
        ChromaClient::new(&self.chroma_url)
            .with_tenant(&self.tenant)
            .with_database(&self.database)
            .with_timeout(Duration::from_secs(self.request_timeout_secs))
    }
}
