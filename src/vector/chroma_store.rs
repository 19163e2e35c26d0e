//! [`VectorStore`] backed by a Chroma collection.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::{VectorStore, generate_id, validate_input_length, validate_limit};
use crate::chroma::{ChromaClient, Collection, Include, ProviderEmbeddingFunction, QueryResponse};
use crate::embedding::EmbeddingProvider;
use crate::errors::{Error, Result};
use crate::memory_types::{MemoryItem, SearchOptions, SearchResult, SimilarityMethod};
use crate::metadata::{Metadata, MetadataValue};

/// Collection used when none is configured.
pub const DEFAULT_COLLECTION_NAME: &str = "memoria-memory";

const QUERY_INCLUDE: &[Include] = &[
    Include::Documents,
    Include::Metadatas,
    Include::Embeddings,
    Include::Distances,
];

/// Memories stored in one Chroma collection, embedded by an [`EmbeddingProvider`].
///
/// The collection handle is created on first use. Concurrent first callers
/// wait on the same setup; a failed setup leaves the store uninitialized and
/// the next call retries.
pub struct ChromaVectorStore {
    provider: Arc<dyn EmbeddingProvider>,
    client: ChromaClient,
    collection_name: String,
    collection: Mutex<Option<Collection>>,
}

impl ChromaVectorStore {
    pub fn new(
        provider: Arc<dyn EmbeddingProvider>,
        client: ChromaClient,
        collection_name: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            client,
            collection_name: collection_name.into(),
            collection: Mutex::new(None),
        }
    }

    /// Store using [`DEFAULT_COLLECTION_NAME`].
    pub fn with_default_collection(provider: Arc<dyn EmbeddingProvider>, client: ChromaClient) -> Self {
        Self::new(provider, client, DEFAULT_COLLECTION_NAME)
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    /// Whether the collection handle is currently held.
    pub async fn is_initialized(&self) -> bool {
        self.collection.lock().await.is_some()
    }

    /// Number of memories in the collection.
    pub async fn count(&self) -> Result<usize> {
        self.collection().await?.count().await
    }

    async fn open_collection(&self) -> Result<Collection> {
        let mut metadata = Metadata::new();
        metadata.insert(
            "hnsw:space".to_string(),
            MetadataValue::from(SimilarityMethod::Cosine.as_space()),
        );
        let embedding_function = ProviderEmbeddingFunction::new(Arc::clone(&self.provider));

        self.client
            .get_or_create_collection(
                &self.collection_name,
                Some(&metadata),
                Some(Arc::new(embedding_function)),
            )
            .await
    }

    async fn collection(&self) -> Result<Collection> {
        let mut guard = self.collection.lock().await;
        if let Some(collection) = guard.as_ref() {
            return Ok(collection.clone());
        }
        let collection = self.open_collection().await?;
        *guard = Some(collection.clone());
        Ok(collection)
    }
}

#[async_trait]
impl VectorStore for ChromaVectorStore {
    async fn initialize(&self) -> Result<()> {
        self.collection().await?;
        Ok(())
    }

    async fn add(&self, content: &str, metadata: Metadata) -> Result<MemoryItem> {
        validate_input_length(content)?;
        let collection = self.collection().await?;

        let id = generate_id();
        let embedding = collection
            .add(
                std::slice::from_ref(&id),
                &[content.to_string()],
                Some(std::slice::from_ref(&metadata)),
            )
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Inference("No embedding produced for content".to_string()))?;
        debug!(%id, "memory added");

        Ok(MemoryItem {
            id,
            content: content.to_string(),
            embedding,
            metadata,
        })
    }

    async fn search(&self, query: &str, options: SearchOptions) -> Result<Vec<SearchResult>> {
        validate_input_length(query)?;
        validate_limit(options.limit)?;
        if options.limit == 0 {
            return Ok(Vec::new());
        }

        let collection = self.collection().await?;
        let response = collection
            .query(&[query.to_string()], options.limit, QUERY_INCLUDE)
            .await?;

        let results = into_search_results(response);
        debug!(count = results.len(), "search complete");
        Ok(results)
    }

    async fn forget(&self, id: &str) -> Result<()> {
        let collection = self.collection().await?;
        collection.delete(&[id.to_string()]).await
    }

    async fn clear(&self) -> Result<()> {
        let mut guard = self.collection.lock().await;
        if guard.is_none() {
            *guard = Some(self.open_collection().await?);
        }

        self.client.delete_collection(&self.collection_name).await?;
        *guard = None;
        info!(collection = %self.collection_name, "collection cleared");

        *guard = Some(self.open_collection().await?);
        Ok(())
    }
}

/// Map the first query's hits to results, keeping the database order.
fn into_search_results(response: QueryResponse) -> Vec<SearchResult> {
    let QueryResponse {
        ids,
        documents,
        metadatas,
        embeddings,
        distances,
    } = response;

    let Some(ids) = ids.into_iter().next() else {
        return Vec::new();
    };
    let mut documents = first_row(documents);
    let mut metadatas = first_row(metadatas);
    let mut embeddings = first_row(embeddings);
    let mut distances = first_row(distances);

    ids.into_iter()
        .enumerate()
        .map(|(i, id)| SearchResult {
            item: MemoryItem {
                id,
                content: take(&mut documents, i).unwrap_or_default(),
                embedding: take(&mut embeddings, i).unwrap_or_default(),
                metadata: take(&mut metadatas, i).unwrap_or_default(),
            },
            score: take(&mut distances, i).unwrap_or(0.0),
        })
        .collect()
}

fn first_row<T>(rows: Option<Vec<Vec<Option<T>>>>) -> Vec<Option<T>> {
    rows.and_then(|rows| rows.into_iter().next()).unwrap_or_default()
}

fn take<T>(row: &mut [Option<T>], i: usize) -> Option<T> {
    row.get_mut(i).and_then(Option::take)
}
