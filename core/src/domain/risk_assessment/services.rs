use std::collections::HashSet;

use tracing::{debug, error, info, instrument, warn};

use crate::domain::{
    common::{services::Service, with_deadline},
    embedding::EmbeddingClient,
    ingredient_extraction::VisionClient,
    knowledge_base::{KnowledgeBaseRepository, entities::SimilarityResult},
    product::ProductCatalog,
    risk_assessment::{
        entities::{RiskAssessment, RiskAssessmentResult, RiskScorerError},
        helpers::{extract_risky_ingredients, parse_model_response},
        ports::{ChatClient, RiskAssessmentService},
        prompts::{HEALTH_EXPERT_SYSTEM_PROMPT, compose_risk_prompt},
    },
    scan::entities::ScanError,
    sensitivity::ProfileRepository,
};

/// Knowledge-base hits requested per ingredient when gathering context.
pub const CONTEXT_RESULTS_PER_INGREDIENT: usize = 3;

impl RiskAssessmentResult {
    pub fn from_assessment(
        assessment: RiskAssessment,
        ingredients_found: Option<Vec<String>>,
    ) -> Self {
        Self {
            overall_risk_level: assessment.overall_risk_level,
            risky_ingredients: extract_risky_ingredients(&assessment.ingredient_details),
            explanation: assessment.explanation,
            ingredients_found,
            recommendations: assessment.recommendations,
        }
    }
}

impl<E, KB, P, V, L, PC> Service<E, KB, P, V, L, PC>
where
    E: EmbeddingClient,
    KB: KnowledgeBaseRepository,
    P: ProfileRepository,
    V: VisionClient,
    L: ChatClient,
    PC: ProductCatalog,
{
    /// Similar knowledge-base entries for every distinct ingredient, merged
    /// and deduplicated by id. Per-ingredient failures only shrink the list.
    pub(crate) async fn gather_knowledge_context(
        &self,
        ingredients: &[String],
    ) -> Vec<SimilarityResult> {
        let mut searched = HashSet::new();
        let mut seen_ids = HashSet::new();
        let mut context = Vec::new();

        for ingredient in ingredients {
            let name = ingredient.trim();
            if name.is_empty() || !searched.insert(name) {
                continue;
            }

            match self
                .search
                .search(name, CONTEXT_RESULTS_PER_INGREDIENT, None)
                .await
            {
                Ok(results) => {
                    context.extend(results.into_iter().filter(|r| seen_ids.insert(r.id)));
                }
                Err(e) => {
                    warn!(ingredient = name, "Vector search failed for ingredient: {}", e);
                }
            }
        }

        debug!(count = context.len(), "gathered knowledge-base context");
        context
    }

    /// Steps shared by both entry points, from sensitivities to the
    /// validated model answer. Only the model call itself can fail.
    pub(crate) async fn assess(
        &self,
        ingredients: &[String],
        user_id: &str,
    ) -> Result<RiskAssessment, RiskScorerError> {
        let sensitivities = self.sensitivity_accessor.get_sensitivities(user_id).await;
        let context = self.gather_knowledge_context(ingredients).await;
        let prompt = compose_risk_prompt(ingredients, &sensitivities, &context);

        let raw = with_deadline(
            self.config.chat_timeout,
            "risk assessment completion",
            self.chat_client
                .complete(HEALTH_EXPERT_SYSTEM_PROMPT.to_string(), prompt),
        )
        .await
        .map_err(|e| {
            error!("LLM call failed during risk assessment: {}", e);
            RiskScorerError::Backend(e.to_string())
        })?;

        let assessment = parse_model_response(&raw);
        info!(
            overall_risk_level = %assessment.overall_risk_level,
            details = assessment.ingredient_details.len(),
            "risk assessment completed"
        );

        Ok(assessment)
    }
}

impl<E, KB, P, V, L, PC> RiskAssessmentService for Service<E, KB, P, V, L, PC>
where
    E: EmbeddingClient,
    KB: KnowledgeBaseRepository,
    P: ProfileRepository,
    V: VisionClient,
    L: ChatClient,
    PC: ProductCatalog,
{
    #[instrument(skip(self, image), fields(image_size = image.len()))]
    async fn assess_from_image(
        &self,
        image: Vec<u8>,
        user_id: String,
    ) -> Result<RiskAssessmentResult, ScanError> {
        let ingredients = self.extractor.extract(&image).await?;
        info!(count = ingredients.len(), "extracted ingredients");

        let assessment = self.assess(&ingredients, &user_id).await?;

        Ok(RiskAssessmentResult::from_assessment(
            assessment,
            Some(ingredients),
        ))
    }

    #[instrument(skip(self, ingredients), fields(ingredients = ingredients.len()))]
    async fn assess_from_ingredients(
        &self,
        ingredients: Vec<String>,
        user_id: String,
    ) -> Result<RiskAssessmentResult, ScanError> {
        let ingredients: Vec<String> = ingredients
            .into_iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();

        let assessment = self.assess(&ingredients, &user_id).await?;

        Ok(RiskAssessmentResult::from_assessment(assessment, None))
    }
}
