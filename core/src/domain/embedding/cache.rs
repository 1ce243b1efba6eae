use moka::future::Cache;

use crate::domain::embedding::entities::EmbeddingVector;

/// Process-wide embedding cache keyed by exact trimmed text.
///
/// Embeddings for a given input and model never change, so entries are kept
/// for the lifetime of the process with no eviction.
#[derive(Clone)]
pub struct EmbeddingCache {
    cache: Cache<String, EmbeddingVector>,
}

impl EmbeddingCache {
    pub fn new() -> Self {
        Self {
            cache: Cache::builder().build(),
        }
    }

    pub async fn get(&self, text: &str) -> Option<EmbeddingVector> {
        self.cache.get(text).await
    }

    pub async fn put(&self, text: String, vector: EmbeddingVector) {
        self.cache.insert(text, vector).await;
    }
}

impl Default for EmbeddingCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EmbeddingCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingCache")
            .field("cache", &"<moka cache>")
            .finish()
    }
}
