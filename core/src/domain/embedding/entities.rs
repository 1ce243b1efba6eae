use std::sync::Arc;

use thiserror::Error;

/// Dimension of `text-embedding-3-small` vectors.
pub const EMBEDDING_DIMENSIONS: usize = 1536;

/// Immutable embedding of one piece of text. Cloning shares the underlying buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingVector(Arc<[f32]>);

impl EmbeddingVector {
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_vec(&self) -> Vec<f32> {
        self.0.to_vec()
    }

    pub fn ptr_eq(&self, other: &EmbeddingVector) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<Vec<f32>> for EmbeddingVector {
    fn from(values: Vec<f32>) -> Self {
        Self(values.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmbeddingError {
    #[error("Invalid embedding input: {0}")]
    InvalidInput(String),

    #[error("Embedding backend error: {0}")]
    Backend(String),
}
