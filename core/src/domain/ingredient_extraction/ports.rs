use std::future::Future;

use crate::domain::common::entities::app_errors::CoreError;

/// Vision-capable model that reads text out of an image.
#[cfg_attr(test, mockall::automock)]
pub trait VisionClient: Send + Sync {
    fn extract_text(
        &self,
        image: Vec<u8>,
        mime_type: String,
        instruction: String,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;
}
