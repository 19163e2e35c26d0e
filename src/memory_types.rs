//! Memory store data types.

use serde::{Deserialize, Serialize};

use crate::embedding::Embedding;
use crate::metadata::Metadata;

/// Default number of results returned by a search.
pub const DEFAULT_SEARCH_LIMIT: usize = 5;

/// A stored piece of content. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryItem {
    /// Randomly generated identifier, unique within a collection in practice.
    pub id: String,
    /// Original text.
    pub content: String,
    /// Vector computed from `content` when the item was added.
    pub embedding: Embedding,
    /// Free-form key-value data.
    #[serde(default)]
    pub metadata: Metadata,
}

/// A search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub item: MemoryItem,
    /// Distance reported by the database (lower is more similar under cosine).
    pub score: f32,
}

/// Similarity metric named by a search.
///
/// The metric actually used is fixed when the collection is created; this is
/// accepted for interface compatibility only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMethod {
    #[default]
    Cosine,
    L2,
    InnerProduct,
}

impl SimilarityMethod {
    /// Value used for the `hnsw:space` collection setting.
    pub fn as_space(&self) -> &'static str {
        match self {
            SimilarityMethod::Cosine => "cosine",
            SimilarityMethod::L2 => "l2",
            SimilarityMethod::InnerProduct => "ip",
        }
    }
}

/// Options for [`crate::VectorStore::search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    pub method: SimilarityMethod,
    /// Maximum number of results; zero yields no results.
    pub limit: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            method: SimilarityMethod::Cosine,
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

impl SearchOptions {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }
}
