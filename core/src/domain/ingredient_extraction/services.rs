use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, instrument, warn};

use crate::domain::{
    common::with_deadline,
    ingredient_extraction::{
        entities::{EXTRACTION_INSTRUCTION, MAX_IMAGE_SIZE, OcrError},
        helpers::{detect_image_format, parse_ingredient_list},
        ports::VisionClient,
    },
};

pub struct IngredientExtractor<V> {
    client: Arc<V>,
    deadline: Duration,
}

impl<V> Clone for IngredientExtractor<V> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            deadline: self.deadline,
        }
    }
}

impl<V> IngredientExtractor<V>
where
    V: VisionClient,
{
    pub fn new(client: Arc<V>, deadline: Duration) -> Self {
        Self { client, deadline }
    }

    /// Reads the ingredient list printed on a product image.
    ///
    /// An empty list means no ingredients were visible and is not an error.
    #[instrument(skip(self, image), fields(image_size = image.len()))]
    pub async fn extract(&self, image: &[u8]) -> Result<Vec<String>, OcrError> {
        if image.is_empty() {
            return Err(OcrError::InvalidImage(
                "image data cannot be empty".to_string(),
            ));
        }
        if image.len() > MAX_IMAGE_SIZE {
            return Err(OcrError::InvalidImage(format!(
                "image size exceeds {} bytes limit",
                MAX_IMAGE_SIZE
            )));
        }

        let format = detect_image_format(image);
        debug!(mime_type = format.mime_type(), "detected image format");

        let raw = with_deadline(
            self.deadline,
            "vision extraction",
            self.client.extract_text(
                image.to_vec(),
                format.mime_type().to_string(),
                EXTRACTION_INSTRUCTION.to_string(),
            ),
        )
        .await
        .map_err(|e| {
            error!("Vision backend failed during extraction: {}", e);
            OcrError::Backend(e.to_string())
        })?;

        let ingredients = parse_ingredient_list(&raw).inspect_err(|e| {
            error!("Failed to parse vision response: {}", e);
        })?;

        if ingredients.is_empty() {
            warn!("No ingredients extracted from image");
        } else {
            info!(count = ingredients.len(), "extracted ingredients from image");
        }

        Ok(ingredients)
    }
}
