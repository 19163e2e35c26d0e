//! Handle to one Chroma collection.

use std::sync::Arc;

use tracing::debug;

use super::embedding_function::EmbeddingFunction;
use super::types::{AddRequest, DeleteRequest, Include, QueryRequest, QueryResponse};
use super::{check_status, ChromaClient};
use crate::embedding::Embedding;
use crate::errors::{Error, Result};
use crate::metadata::Metadata;

/// A named collection plus the embedding function used for its documents and queries.
#[derive(Clone)]
pub struct Collection {
    pub(crate) client: ChromaClient,
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) metadata: Option<Metadata>,
    pub(crate) embedding_function: Option<Arc<dyn EmbeddingFunction>>,
}

impl std::fmt::Debug for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("metadata", &self.metadata)
            .field(
                "embedding_function",
                &self.embedding_function.as_ref().map(|ef| ef.name().to_string()),
            )
            .finish()
    }
}

impl Collection {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    pub fn embedding_function(&self) -> Option<&Arc<dyn EmbeddingFunction>> {
        self.embedding_function.as_ref()
    }

    fn url(&self, action: &str) -> String {
        format!("{}/{}/{}", self.client.collections_url(), self.id, action)
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        let function = self
            .embedding_function
            .as_ref()
            .ok_or(Error::ProviderNotConfigured)?;
        function.generate(texts).await
    }

    /// Embed and persist documents, returning the vectors that were stored.
    ///
    /// `metadatas`, when given, must have one entry per id. It is left out of
    /// the request entirely when every entry is empty.
    pub async fn add(
        &self,
        ids: &[String],
        documents: &[String],
        metadatas: Option<&[Metadata]>,
    ) -> Result<Vec<Embedding>> {
        if ids.len() != documents.len() {
            return Err(Error::InvalidInput(format!(
                "{} ids but {} documents",
                ids.len(),
                documents.len()
            )));
        }
        if let Some(metadatas) = metadatas {
            if metadatas.len() != ids.len() {
                return Err(Error::InvalidInput(format!(
                    "{} ids but {} metadatas",
                    ids.len(),
                    metadatas.len()
                )));
            }
        }

        let embeddings = self.embed(documents).await?;
        let metadatas = metadatas.filter(|m| m.iter().any(|entry| !entry.is_empty()));

        debug!(collection = %self.name, count = ids.len(), "adding records");
        let response = self
            .client
            .http
            .post(self.url("add"))
            .json(&AddRequest {
                ids,
                embeddings: &embeddings,
                documents,
                metadatas,
            })
            .send()
            .await?;
        check_status(response).await?;

        Ok(embeddings)
    }

    /// Nearest-neighbour query for each text, at most `n_results` hits per text.
    pub async fn query(
        &self,
        query_texts: &[String],
        n_results: usize,
        include: &[Include],
    ) -> Result<QueryResponse> {
        let query_embeddings = self.embed(query_texts).await?;

        debug!(collection = %self.name, n_results, "querying");
        let response = self
            .client
            .http
            .post(self.url("query"))
            .json(&QueryRequest {
                query_embeddings: &query_embeddings,
                n_results,
                include,
            })
            .send()
            .await?;
        let response = check_status(response).await?;

        Ok(response.json().await?)
    }

    /// Delete records by id. Unknown ids are left to the server's semantics.
    pub async fn delete(&self, ids: &[String]) -> Result<()> {
        debug!(collection = %self.name, count = ids.len(), "deleting records");
        let response = self
            .client
            .http
            .post(self.url("delete"))
            .json(&DeleteRequest { ids })
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    /// Number of records in the collection.
    pub async fn count(&self) -> Result<usize> {
        let response = self.client.http.get(self.url("count")).send().await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }
}
