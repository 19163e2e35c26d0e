//! Configuration validation logic.

use crate::errors::Error;
use crate::vector::MAX_SEARCH_LIMIT;

/// Validates configuration values.
pub struct ConfigValidator {
    /// Base URL of the Chroma server.
    pub chroma_url: String,
    /// Collection name.
    pub collection: String,
    /// HuggingFace embedding model identifier.
    pub embedding_model: String,
    /// Embedding dimensionality.
    pub embedding_dims: usize,
    /// Default search limit.
    pub search_limit: usize,
    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl ConfigValidator {
    /// Validate all configuration values for correctness and constraints.
    ///
    /// Checks that:
    /// - Chroma URL is non-empty and uses http or https
    /// - Collection name and embedding model are not empty
    /// - Embedding dimensions and request timeout are positive
    /// - Search limit is between 1 and `MAX_SEARCH_LIMIT`
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if any validation check fails.
    pub fn validate(&self) -> Result<(), Error> {
        self.validate_chroma_url()?;
        self.validate_collection()?;
        self.validate_embedding_model()?;
        self.validate_embedding_dims()?;
        self.validate_search_limit()?;
        self.validate_request_timeout()?;

        Ok(())
    }

    fn validate_chroma_url(&self) -> Result<(), Error> {
        let url = self.chroma_url.trim();
        if url.is_empty() {
            return Err(Error::Config("Chroma URL cannot be empty".to_string()));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(Error::Config(format!(
                "Invalid Chroma URL: {url} (must start with http:// or https://)"
            )));
        }
        Ok(())
    }

    fn validate_collection(&self) -> Result<(), Error> {
        if self.collection.trim().is_empty() {
            return Err(Error::Config("Collection name cannot be empty".to_string()));
        }
        Ok(())
    }

    fn validate_embedding_model(&self) -> Result<(), Error> {
        if self.embedding_model.trim().is_empty() {
            return Err(Error::Config("Embedding model cannot be empty".to_string()));
        }
        Ok(())
    }

    fn validate_embedding_dims(&self) -> Result<(), Error> {
        if self.embedding_dims == 0 {
            return Err(Error::Config(
                "Invalid embedding dimensions: 0 (must be positive)".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_search_limit(&self) -> Result<(), Error> {
        if self.search_limit == 0 || self.search_limit > MAX_SEARCH_LIMIT {
            return Err(Error::Config(format!(
                "Invalid search limit: {} (must be between 1 and {MAX_SEARCH_LIMIT})",
                self.search_limit
            )));
        }
        Ok(())
    }

    fn validate_request_timeout(&self) -> Result<(), Error> {
        if self.request_timeout_secs == 0 {
            return Err(Error::Config(
                "Invalid request timeout: 0 (must be positive)".to_string(),
            ));
        }
        Ok(())
    }
}
