use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error};

use crate::domain::{
    common::with_deadline,
    embedding::{
        cache::EmbeddingCache,
        entities::{EmbeddingError, EmbeddingVector},
        ports::EmbeddingClient,
    },
};

/// Cache-fronted embedding generator shared by every search.
pub struct Embedder<E> {
    client: Arc<E>,
    cache: EmbeddingCache,
    deadline: Duration,
}

impl<E> Clone for Embedder<E> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            cache: self.cache.clone(),
            deadline: self.deadline,
        }
    }
}

impl<E> Embedder<E>
where
    E: EmbeddingClient,
{
    pub fn new(client: Arc<E>, cache: EmbeddingCache, deadline: Duration) -> Self {
        Self {
            client,
            cache,
            deadline,
        }
    }

    /// Returns the embedding for `text`, keyed by its trimmed form.
    pub async fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        let key = text.trim();
        if key.is_empty() {
            return Err(EmbeddingError::InvalidInput(
                "text cannot be empty".to_string(),
            ));
        }

        if let Some(vector) = self.cache.get(key).await {
            debug!(text = key, "embedding cache hit");
            return Ok(vector);
        }

        let values = with_deadline(
            self.deadline,
            "embedding request",
            self.client.embed(key.to_string()),
        )
        .await
        .map_err(|e| {
            error!(text = key, "Failed to generate embedding: {}", e);
            EmbeddingError::Backend(e.to_string())
        })?;

        if values.is_empty() {
            return Err(EmbeddingError::Backend(
                "embedding backend returned an empty vector".to_string(),
            ));
        }

        let vector = EmbeddingVector::from(values);
        self.cache.put(key.to_string(), vector.clone()).await;
        debug!(text = key, "embedding cache miss, stored new vector");

        Ok(vector)
    }
}
