//! Vector store: persists memories and answers similarity queries.

mod chroma_store;

use async_trait::async_trait;
use rand::Rng;

use crate::errors::{Error, Result};
use crate::memory_types::{MemoryItem, SearchOptions, SearchResult};
use crate::metadata::Metadata;

pub use chroma_store::{ChromaVectorStore, DEFAULT_COLLECTION_NAME};

/// Maximum allowed input length (100,000 bytes) for content and queries.
pub const MAX_INPUT_LENGTH: usize = 100_000;
/// Maximum allowed limit for search operations.
pub const MAX_SEARCH_LIMIT: usize = 10_000;

/// Length of generated memory ids.
const ID_LENGTH: usize = 9;
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Storage and similarity search over memories.
///
/// Every operation initializes the store on first use, so calling
/// [`VectorStore::initialize`] up front is optional.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Attach to (or create) the backing collection. Idempotent.
    async fn initialize(&self) -> Result<()>;

    /// Persist `content` under a newly generated id.
    async fn add(&self, content: &str, metadata: Metadata) -> Result<MemoryItem>;

    /// Nearest memories to `query`, in the database's ranking order.
    async fn search(&self, query: &str, options: SearchOptions) -> Result<Vec<SearchResult>>;

    /// Remove one memory. Unknown ids are not an error.
    async fn forget(&self, id: &str) -> Result<()>;

    /// Remove every memory. Irreversible.
    async fn clear(&self) -> Result<()>;
}

/// Random lowercase alphanumeric id. Collisions are possible but not checked.
pub fn generate_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_LENGTH)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

pub(crate) fn validate_input_length(text: &str) -> Result<()> {
    if text.len() > MAX_INPUT_LENGTH {
        return Err(Error::InputTooLong {
            max_length: MAX_INPUT_LENGTH,
            actual_length: text.len(),
        });
    }
    Ok(())
}

pub(crate) fn validate_limit(limit: usize) -> Result<()> {
    if limit > MAX_SEARCH_LIMIT {
        return Err(Error::InvalidInput(format!(
            "Search limit {limit} exceeds maximum of {MAX_SEARCH_LIMIT}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_id_shape() {
        let id = generate_id();

        assert_eq!(id.len(), ID_LENGTH);
        assert!(id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_generated_ids_differ() {
        let ids: std::collections::HashSet<String> = (0..100).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_empty_input_accepted() {
        assert!(validate_input_length("").is_ok());
    }

    #[test]
    fn test_oversized_input_rejected() {
        let text = "x".repeat(MAX_INPUT_LENGTH + 1);
        let result = validate_input_length(&text);

        assert!(matches!(
            result,
            Err(Error::InputTooLong {
                max_length: MAX_INPUT_LENGTH,
                ..
            })
        ));
    }

    #[test]
    fn test_limit_bounds() {
        assert!(validate_limit(0).is_ok());
        assert!(validate_limit(MAX_SEARCH_LIMIT).is_ok());
        assert!(matches!(
            validate_limit(MAX_SEARCH_LIMIT + 1),
            Err(Error::InvalidInput(_))
        ));
    }
}
