use std::fmt;

use thiserror::Error;

/// Largest image accepted for extraction, in bytes.
pub const MAX_IMAGE_SIZE: usize = 20 * 1024 * 1024;

/// Fixed instruction sent alongside every image.
pub const EXTRACTION_INSTRUCTION: &str = "Extract every word from this ingredient list and return it as a clean JSON list of strings. Return only valid JSON.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Webp => "image/webp",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OcrError {
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Invalid JSON in vision response: {0}")]
    ExtractionParse(String),

    #[error("Vision backend error: {0}")]
    Backend(String),
}
