use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{
    common::{format_timestamp, generate_timestamp, generate_uuid_v7},
    ingredient_extraction::entities::OcrError,
    product::entities::ProductSummary,
    risk_assessment::entities::{
        IngredientDetail, OverallRiskLevel, RiskAssessmentResult, RiskScorerError,
    },
    sensitivity::entities::{ANONYMOUS_USER, is_anonymous},
};

/// The response returned to callers for one scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub scan_id: Uuid,
    pub user_id: String,
    pub overall_risk_level: OverallRiskLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients_found: Option<Vec<String>>,
    pub risky_ingredients: Vec<IngredientDetail>,
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductSummary>,
    pub timestamp: String,
}

impl ScanResult {
    pub fn assemble(
        scan_id: Uuid,
        at: DateTime<Utc>,
        user_id: &str,
        result: RiskAssessmentResult,
        product: Option<ProductSummary>,
    ) -> Self {
        let user_id = if is_anonymous(user_id) {
            ANONYMOUS_USER.to_string()
        } else {
            user_id.trim().to_string()
        };

        Self {
            scan_id,
            user_id,
            overall_risk_level: result.overall_risk_level,
            ingredients_found: result.ingredients_found,
            risky_ingredients: result.risky_ingredients,
            explanation: result.explanation,
            recommendations: result.recommendations,
            product,
            timestamp: format_timestamp(at),
        }
    }
}

/// Stamps an assessment with a fresh scan id and the current time.
pub fn shape_scan_result(
    user_id: &str,
    result: RiskAssessmentResult,
    product: Option<ProductSummary>,
) -> ScanResult {
    let (now, _) = generate_timestamp();
    ScanResult::assemble(generate_uuid_v7(), now, user_id, result, product)
}

/// Pipeline-level failure. Soft failures never surface here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to extract ingredients from image: {0}")]
    Extraction(OcrError),

    #[error("Risk assessment failed: {0}")]
    RiskScorer(#[from] RiskScorerError),

    #[error("No product found for barcode {0}")]
    ProductNotFound(String),

    #[error("Product catalog unavailable: {0}")]
    Catalog(String),
}

impl From<OcrError> for ScanError {
    fn from(error: OcrError) -> Self {
        match error {
            OcrError::InvalidImage(message) => ScanError::InvalidInput(message),
            other => ScanError::Extraction(other),
        }
    }
}
