use crate::domain::knowledge_base::entities::SimilarityResult;

pub const HEALTH_EXPERT_SYSTEM_PROMPT: &str = "You are a medical expert specializing in vaginal health and ingredient safety assessment.
Your role is to provide evidence-based health guidance about personal care product ingredients and their potential effects on vaginal health.

You have deep knowledge of:
- Ingredient chemistry and properties
- Common vaginal irritants and allergens
- Vulvovaginal conditions and sensitivities
- Scientific research on ingredient safety
- Individual variation in sensitivity profiles

When assessing ingredients, consider:
1. Direct chemical irritancy
2. pH disruption potential
3. Allergenic properties
4. Individual sensitivities provided by the user
5. Synergistic effects of multiple ingredients

Always provide balanced, evidence-based guidance.";

pub const RISK_ASSESSMENT_TEMPLATE: &str = r#"Based on the following information, assess the health risk level of this personal care product:

SCANNED INGREDIENTS:
{scanned_ingredients}

USER SENSITIVITIES:
{user_sensitivities}

SIMILAR INGREDIENTS FROM KNOWLEDGE BASE:
{knowledge_context}

ASSESSMENT TASK:
1. Evaluate each ingredient against the user's known sensitivities
2. Cross-reference with similar ingredients in the knowledge base for risk patterns
3. Consider synergistic effects of multiple ingredients
4. Provide an overall risk level assessment

RESPONSE FORMAT:
You MUST respond with ONLY a valid JSON object (no markdown, no code blocks) with this structure:
{
    "overall_risk_level": "Low Risk (Safe)" | "Caution (Irritating)" | "High Risk (Harmful)",
    "explanation": "Brief 2-sentence explanation of the risk assessment",
    "ingredient_details": [
        {
            "name": "ingredient name",
            "risk_level": "Low" | "Medium" | "High",
            "reason": "Why this ingredient poses this risk level"
        }
    ],
    "recommendations": "Actionable advice for the user"
}

RISK LEVEL DEFINITIONS:
- Low Risk (Safe): Ingredient is generally safe for most people, unlikely to cause irritation
- Caution (Irritating): Ingredient may cause irritation for some users or in certain combinations
- High Risk (Harmful): Ingredient is known to cause problems for sensitive individuals or contains concerning substances

Ensure your response is ONLY valid JSON with no additional text."#;

pub const NO_INGREDIENTS: &str = "None";
pub const NO_SENSITIVITIES: &str = "No known sensitivities";
pub const NO_KNOWLEDGE_CONTEXT: &str = "No similar ingredients found in knowledge base";

/// Renders the user prompt for one assessment. Pure and deterministic.
pub fn compose_risk_prompt(
    ingredients: &[String],
    sensitivities: &[String],
    knowledge_context: &[SimilarityResult],
) -> String {
    let scanned_ingredients = if ingredients.is_empty() {
        NO_INGREDIENTS.to_string()
    } else {
        ingredients.join(", ")
    };

    let user_sensitivities = if sensitivities.is_empty() {
        NO_SENSITIVITIES.to_string()
    } else {
        sensitivities.join(", ")
    };

    let knowledge = if knowledge_context.is_empty() {
        NO_KNOWLEDGE_CONTEXT.to_string()
    } else {
        knowledge_context
            .iter()
            .map(|item| {
                format!(
                    "- {}: {} (Risk Level: {})",
                    item.name, item.description, item.risk_level
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    render_template(
        RISK_ASSESSMENT_TEMPLATE,
        &[
            ("{scanned_ingredients}", scanned_ingredients.as_str()),
            ("{user_sensitivities}", user_sensitivities.as_str()),
            ("{knowledge_context}", knowledge.as_str()),
        ],
    )
}

/// Fills placeholders in one pass over the template. Substituted text is
/// never scanned again, so values may contain placeholder-like braces.
fn render_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        rendered.push_str(&rest[..start]);
        let tail = &rest[start..];

        match values.iter().find(|(key, _)| tail.starts_with(key)) {
            Some((key, value)) => {
                rendered.push_str(value);
                rest = &tail[key.len()..];
            }
            None => {
                rendered.push('{');
                rest = &tail[1..];
            }
        }
    }

    rendered.push_str(rest);
    rendered
}
