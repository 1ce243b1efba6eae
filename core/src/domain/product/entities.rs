use serde::{Deserialize, Serialize};

use crate::domain::knowledge_base::entities::IngredientId;

pub const UNKNOWN_BRAND: &str = "Unknown Brand";

/// Catalog row as stored: ingredients are knowledge-base ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: i64,
    pub brand_name: Option<String>,
    pub barcode: String,
    #[serde(default)]
    pub ingredients: Option<Vec<IngredientId>>,
    pub product_type: Option<String>,
    pub coverage_score: Option<f64>,
    pub research_count: Option<i64>,
}

/// Catalog product with ingredient names resolved, in catalog order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub brand_name: String,
    pub barcode: String,
    pub ingredients: Vec<String>,
    pub product_type: Option<String>,
    pub coverage_score: Option<f64>,
    pub research_count: Option<i64>,
}

/// Product identity attached to barcode scan results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: i64,
    pub brand_name: String,
    pub barcode: String,
}

impl From<&Product> for ProductSummary {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            brand_name: product.brand_name.clone(),
            barcode: product.barcode.clone(),
        }
    }
}

impl Product {
    pub fn from_record(record: ProductRecord, ingredients: Vec<String>) -> Self {
        Self {
            id: record.id,
            brand_name: record
                .brand_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_BRAND.to_string()),
            barcode: record.barcode,
            ingredients,
            product_type: record.product_type,
            coverage_score: record.coverage_score,
            research_count: record.research_count,
        }
    }
}
