//! Minimal async client for the Chroma vector database HTTP API.
//!
//! Covers exactly what the vector store needs: collection get-or-create,
//! lookup and deletion, plus add, query, delete and count on a collection.
//! Indexing and distance computation stay on the server.

mod collection;
pub mod embedding_function;
mod types;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::errors::{Error, Result};
use crate::metadata::Metadata;

pub use collection::Collection;
pub use embedding_function::{
    EmbeddingFunction, EmbeddingFunctionFactory, ProviderEmbeddingFunction,
    PROVIDER_EMBEDDING_FUNCTION, build_embedding_function, register_embedding_function,
};
pub use types::{Include, QueryResponse};

use types::{CollectionModel, CreateCollectionRequest};

/// Default Chroma server address.
pub const DEFAULT_CHROMA_URL: &str = "http://localhost:8000";
/// Default tenant name.
pub const DEFAULT_TENANT: &str = "default_tenant";
/// Default database name.
pub const DEFAULT_DATABASE: &str = "default_database";

/// Client handle for one Chroma tenant/database. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ChromaClient {
    pub(crate) http: reqwest::Client,
    base_url: String,
    tenant: String,
    database: String,
}

impl ChromaClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tenant: DEFAULT_TENANT.to_string(),
            database: DEFAULT_DATABASE.to_string(),
        }
    }

    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = tenant.into();
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Apply a per-request timeout to every call made by this client.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn collections_url(&self) -> String {
        format!(
            "{}/api/v2/tenants/{}/databases/{}/collections",
            self.base_url, self.tenant, self.database
        )
    }

    /// Check that the server is reachable.
    pub async fn heartbeat(&self) -> Result<()> {
        let response = self
            .http
            .get(format!("{}/api/v2/heartbeat", self.base_url))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    /// Attach to the collection `name`, creating it if absent.
    ///
    /// The embedding function's name is recorded in the collection
    /// configuration so the collection can later be reopened without one.
    pub async fn get_or_create_collection(
        &self,
        name: &str,
        metadata: Option<&Metadata>,
        embedding_function: Option<Arc<dyn EmbeddingFunction>>,
    ) -> Result<Collection> {
        let configuration = embedding_function.as_ref().map(|ef| {
            serde_json::json!({
                "embedding_function": {
                    "type": "known",
                    "name": ef.name(),
                    "config": ef.config(),
                }
            })
        });

        debug!(collection = name, "get or create collection");
        let response = self
            .http
            .post(self.collections_url())
            .json(&CreateCollectionRequest {
                name,
                metadata,
                configuration,
                get_or_create: true,
            })
            .send()
            .await?;
        let model: CollectionModel = check_status(response).await?.json().await?;
        info!(collection = %model.name, id = %model.id, "collection ready");

        Ok(self.collection_from_model(model, embedding_function))
    }

    /// Open an existing collection.
    ///
    /// The embedding function is rebuilt from the registry by the name stored
    /// in the collection configuration; unknown names leave it unset.
    pub async fn get_collection(&self, name: &str) -> Result<Collection> {
        let response = self
            .http
            .get(format!("{}/{}", self.collections_url(), name))
            .send()
            .await?;
        let model: CollectionModel = check_status(response).await?.json().await?;

        let embedding_function = model.embedding_function_name().and_then(|ef_name| {
            let config = model
                .configuration_json
                .as_ref()
                .and_then(|c| c.get("embedding_function"))
                .and_then(|ef| ef.get("config"))
                .cloned()
                .unwrap_or_else(|| serde_json::json!({}));
            build_embedding_function(ef_name, &config)
        });

        Ok(self.collection_from_model(model, embedding_function))
    }

    /// Delete the collection `name` and everything in it.
    pub async fn delete_collection(&self, name: &str) -> Result<()> {
        info!(collection = name, "deleting collection");
        let response = self
            .http
            .delete(format!("{}/{}", self.collections_url(), name))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    fn collection_from_model(
        &self,
        model: CollectionModel,
        embedding_function: Option<Arc<dyn EmbeddingFunction>>,
    ) -> Collection {
        Collection {
            client: self.clone(),
            id: model.id,
            name: model.name,
            metadata: model.metadata,
            embedding_function,
        }
    }
}

/// Turn a non-success response into [`Error::Database`].
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(Error::Database {
        status: status.as_u16(),
        message,
    })
}
