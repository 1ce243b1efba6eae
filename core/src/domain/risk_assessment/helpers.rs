use serde_json::{Map, Value};
use tracing::warn;

use crate::domain::risk_assessment::entities::{
    DEFAULT_MODEL_RISK_LABEL, IngredientDetail, MANUAL_REVIEW_EXPLANATION, MISSING_EXPLANATION,
    MISSING_INGREDIENT_REASON, OverallRiskLevel, RiskAssessment, UNKNOWN_INGREDIENT_NAME,
    classify_detail_risk,
};

/// Maps the model's free-text verdict onto the closed vocabulary.
///
/// Keyword based and case-insensitive, so qualifiers such as
/// "Low Risk (Safe)" classify correctly. A low label must also say "safe";
/// anything unmatched is `Caution`.
pub fn normalize_risk_level(label: &str) -> OverallRiskLevel {
    let label = label.to_lowercase();

    if label.contains("low") && label.contains("safe") {
        OverallRiskLevel::LowRisk
    } else if label.contains("caution") || label.contains("irritat") {
        OverallRiskLevel::Caution
    } else if label.contains("high") || label.contains("harm") {
        OverallRiskLevel::HighRisk
    } else {
        OverallRiskLevel::Caution
    }
}

/// Medium and High entries only, in model order.
pub fn extract_risky_ingredients(details: &[IngredientDetail]) -> Vec<IngredientDetail> {
    details
        .iter()
        .filter(|detail| detail.is_risky())
        .cloned()
        .collect()
}

/// Assessment used when the model's answer cannot be read at all.
pub fn conservative_assessment() -> RiskAssessment {
    RiskAssessment {
        overall_risk_level: normalize_risk_level(DEFAULT_MODEL_RISK_LABEL),
        explanation: MANUAL_REVIEW_EXPLANATION.to_string(),
        ingredient_details: Vec::new(),
        recommendations: None,
    }
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Entries that are not objects, or whose risk label names none of
/// Low, Medium or High, are dropped.
fn ingredient_detail(value: &Value) -> Option<IngredientDetail> {
    let object = value.as_object()?;
    let name = string_field(object, "name").unwrap_or_else(|| UNKNOWN_INGREDIENT_NAME.to_string());

    let Some(risk_level) = string_field(object, "risk_level")
        .as_deref()
        .and_then(classify_detail_risk)
    else {
        warn!(ingredient = %name, "Dropping ingredient detail without a recognised risk level");
        return None;
    };

    Some(IngredientDetail {
        name,
        risk_level,
        reason: string_field(object, "reason")
            .unwrap_or_else(|| MISSING_INGREDIENT_REASON.to_string()),
    })
}

/// Validates the model's raw answer into a [`RiskAssessment`].
///
/// Never fails. Unparseable output and non-object JSON yield
/// [`conservative_assessment`]; a parseable object has each missing or
/// mistyped field backfilled on its own.
pub fn parse_model_response(raw: &str) -> RiskAssessment {
    let object = match serde_json::from_str::<Value>(raw.trim()) {
        Ok(Value::Object(object)) => object,
        Ok(_) => {
            warn!("LLM response is not a JSON object, using conservative assessment");
            return conservative_assessment();
        }
        Err(e) => {
            warn!("Failed to parse LLM JSON response: {}", e);
            return conservative_assessment();
        }
    };

    let label = string_field(&object, "overall_risk_level").unwrap_or_else(|| {
        warn!("LLM response missing overall_risk_level, using default");
        DEFAULT_MODEL_RISK_LABEL.to_string()
    });

    let explanation = string_field(&object, "explanation").unwrap_or_else(|| {
        warn!("LLM response missing explanation, using default");
        MISSING_EXPLANATION.to_string()
    });

    let ingredient_details = match object.get("ingredient_details") {
        Some(Value::Array(items)) => items.iter().filter_map(ingredient_detail).collect(),
        _ => {
            warn!("LLM response missing ingredient_details, using empty list");
            Vec::new()
        }
    };

    RiskAssessment {
        overall_risk_level: normalize_risk_level(&label),
        explanation,
        ingredient_details,
        recommendations: string_field(&object, "recommendations"),
    }
}
