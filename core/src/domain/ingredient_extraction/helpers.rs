use serde_json::Value;

use crate::domain::ingredient_extraction::entities::{ImageFormat, OcrError};

/// Best-effort container sniffing from magic bytes. Unknown data is
/// reported as JPEG.
pub fn detect_image_format(image: &[u8]) -> ImageFormat {
    if image.starts_with(&[0xFF, 0xD8, 0xFF]) {
        ImageFormat::Jpeg
    } else if image.starts_with(b"\x89PNG") {
        ImageFormat::Png
    } else if image.starts_with(b"GIF8") {
        ImageFormat::Gif
    } else if image.starts_with(b"RIFF") && image.len() >= 12 && &image[8..12] == b"WEBP" {
        ImageFormat::Webp
    } else {
        ImageFormat::Jpeg
    }
}

/// Parses the vision model's answer as a JSON array of ingredient names.
///
/// Scalars are stringified and trimmed; blank entries, nulls and nested
/// values are dropped. Anything that is not a JSON array is rejected.
pub fn parse_ingredient_list(raw: &str) -> Result<Vec<String>, OcrError> {
    let value: Value = serde_json::from_str(raw.trim())
        .map_err(|e| OcrError::ExtractionParse(e.to_string()))?;

    let Value::Array(items) = value else {
        return Err(OcrError::ExtractionParse(
            "response is not a JSON list".to_string(),
        ));
    };

    let ingredients = items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(true) => Some("true".to_string()),
            _ => None,
        })
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    Ok(ingredients)
}
