use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::knowledge_base::entities::RiskLevel;

/// Label used when the model omits or garbles the overall risk level.
pub const DEFAULT_MODEL_RISK_LABEL: &str = "Caution (Irritating)";
pub const MISSING_EXPLANATION: &str = "Unable to generate detailed explanation";
pub const MANUAL_REVIEW_EXPLANATION: &str = "Assessment requires manual review";

pub const UNKNOWN_INGREDIENT_NAME: &str = "Unknown";
pub const MISSING_INGREDIENT_REASON: &str = "No details available";

/// Closed vocabulary for the product-level verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverallRiskLevel {
    #[serde(rename = "Low Risk")]
    LowRisk,
    #[serde(rename = "Caution")]
    Caution,
    #[serde(rename = "High Risk")]
    HighRisk,
}

impl OverallRiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverallRiskLevel::LowRisk => "Low Risk",
            OverallRiskLevel::Caution => "Caution",
            OverallRiskLevel::HighRisk => "High Risk",
        }
    }
}

impl fmt::Display for OverallRiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-ingredient verdict, classified onto the knowledge-base vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientDetail {
    pub name: String,
    pub risk_level: RiskLevel,
    pub reason: String,
}

impl IngredientDetail {
    pub fn is_risky(&self) -> bool {
        matches!(self.risk_level, RiskLevel::Medium | RiskLevel::High)
    }
}

/// Keyword classification of a free-text risk label, strongest first.
pub fn classify_detail_risk(label: &str) -> Option<RiskLevel> {
    let label = label.to_lowercase();
    if label.contains("high") {
        Some(RiskLevel::High)
    } else if label.contains("medium") {
        Some(RiskLevel::Medium)
    } else if label.contains("low") {
        Some(RiskLevel::Low)
    } else {
        None
    }
}

/// Validated model output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub overall_risk_level: OverallRiskLevel,
    pub explanation: String,
    pub ingredient_details: Vec<IngredientDetail>,
    pub recommendations: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessmentResult {
    pub overall_risk_level: OverallRiskLevel,
    pub explanation: String,
    /// Only set when the ingredients were read from an image.
    pub ingredients_found: Option<Vec<String>>,
    pub risky_ingredients: Vec<IngredientDetail>,
    pub recommendations: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RiskScorerError {
    #[error("LLM assessment failed: {0}")]
    Backend(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(risk_level: RiskLevel) -> IngredientDetail {
        IngredientDetail {
            name: "Fragrance".to_string(),
            risk_level,
            reason: "test".to_string(),
        }
    }

    #[test]
    fn test_overall_risk_level_serializes_to_display_labels() {
        assert_eq!(
            serde_json::to_string(&OverallRiskLevel::LowRisk).unwrap(),
            r#""Low Risk""#
        );
        assert_eq!(
            serde_json::to_string(&OverallRiskLevel::HighRisk).unwrap(),
            r#""High Risk""#
        );
        assert_eq!(OverallRiskLevel::Caution.to_string(), "Caution");
    }

    #[test]
    fn test_classify_detail_risk() {
        assert_eq!(classify_detail_risk("High"), Some(RiskLevel::High));
        assert_eq!(classify_detail_risk("medium"), Some(RiskLevel::Medium));
        assert_eq!(classify_detail_risk("Medium-High"), Some(RiskLevel::High));
        assert_eq!(classify_detail_risk("Severe-ish, not medium"), Some(RiskLevel::Medium));
        assert_eq!(classify_detail_risk("Low"), Some(RiskLevel::Low));
        assert_eq!(classify_detail_risk("Unknown"), None);
        assert_eq!(classify_detail_risk(""), None);
    }

    #[test]
    fn test_low_details_are_never_risky() {
        assert!(!detail(RiskLevel::Low).is_risky());
        assert!(detail(RiskLevel::Medium).is_risky());
        assert!(detail(RiskLevel::High).is_risky());
    }
}
