use std::collections::HashMap;

use crate::domain::{
    knowledge_base::entities::{IngredientId, IngredientRef},
    scan::entities::ScanError,
};

pub const MIN_BARCODE_LENGTH: usize = 8;
pub const MAX_BARCODE_LENGTH: usize = 14;

/// Accepts EAN-8 through GTIN-14: 8 to 14 ASCII digits after trimming.
pub fn validate_barcode(raw: &str) -> Result<String, ScanError> {
    let barcode = raw.trim();
    if barcode.is_empty() {
        return Err(ScanError::InvalidInput(
            "barcode cannot be empty".to_string(),
        ));
    }

    let valid_length = (MIN_BARCODE_LENGTH..=MAX_BARCODE_LENGTH).contains(&barcode.len());
    if !valid_length || !barcode.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ScanError::InvalidInput(format!(
            "barcode must be {}-{} digits, got '{}'",
            MIN_BARCODE_LENGTH, MAX_BARCODE_LENGTH, barcode
        )));
    }

    Ok(barcode.to_string())
}

/// Names in the order of `ids`. Ids missing from `resolved` render as
/// `Unknown (ID: <id>)`; if nothing resolved at all the list is empty.
pub fn order_ingredient_names(ids: &[IngredientId], resolved: Vec<IngredientRef>) -> Vec<String> {
    if resolved.is_empty() {
        return Vec::new();
    }

    let names: HashMap<IngredientId, String> =
        resolved.into_iter().map(|r| (r.id, r.name)).collect();

    ids.iter()
        .map(|id| {
            names
                .get(id)
                .cloned()
                .unwrap_or_else(|| format!("Unknown (ID: {})", id))
        })
        .collect()
}
