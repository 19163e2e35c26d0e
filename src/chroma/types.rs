//! Request and response bodies of the Chroma v2 HTTP API.

use serde::{Deserialize, Serialize};

use crate::embedding::Embedding;
use crate::metadata::Metadata;

/// Fields a query may ask Chroma to return besides ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Include {
    Documents,
    Metadatas,
    Embeddings,
    Distances,
}

/// Collection as described by the server.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CollectionModel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub metadata: Option<Metadata>,
    #[serde(default)]
    pub configuration_json: Option<serde_json::Value>,
}

impl CollectionModel {
    /// Name of the embedding function recorded in the collection configuration.
    pub fn embedding_function_name(&self) -> Option<&str> {
        self.configuration_json
            .as_ref()?
            .get("embedding_function")?
            .get("name")?
            .as_str()
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateCollectionRequest<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<&'a Metadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<serde_json::Value>,
    pub get_or_create: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct AddRequest<'a> {
    pub ids: &'a [String],
    pub embeddings: &'a [Embedding],
    pub documents: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadatas: Option<&'a [Metadata]>,
}

#[derive(Debug, Serialize)]
pub(crate) struct QueryRequest<'a> {
    pub query_embeddings: &'a [Embedding],
    pub n_results: usize,
    pub include: &'a [Include],
}

#[derive(Debug, Serialize)]
pub(crate) struct DeleteRequest<'a> {
    pub ids: &'a [String],
}

/// Query result: one inner list per query text, ordered nearest first.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryResponse {
    pub ids: Vec<Vec<String>>,
    #[serde(default)]
    pub documents: Option<Vec<Vec<Option<String>>>>,
    #[serde(default)]
    pub metadatas: Option<Vec<Vec<Option<Metadata>>>>,
    #[serde(default)]
    pub embeddings: Option<Vec<Vec<Option<Embedding>>>>,
    #[serde(default)]
    pub distances: Option<Vec<Vec<Option<f32>>>>,
}
