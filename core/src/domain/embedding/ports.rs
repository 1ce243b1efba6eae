use std::future::Future;

use crate::domain::common::entities::app_errors::CoreError;

/// Remote model that turns text into a vector. Retries belong to the implementation.
#[cfg_attr(test, mockall::automock)]
pub trait EmbeddingClient: Send + Sync {
    fn embed(&self, text: String) -> impl Future<Output = Result<Vec<f32>, CoreError>> + Send;
}
