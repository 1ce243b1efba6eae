use serde::Deserialize;
use tracing::warn;

use crate::domain::{
    knowledge_base::entities::{
        IngredientId, IngredientRef, IngredientSummary, KnowledgeBaseEntry, RiskLevel,
        SimilarityResult,
    },
    sensitivity::entities::RawSensitivities,
};

/// pgvector columns come back from PostgREST as a string like `"[0.1,0.2]"`;
/// RPC results may already be arrays.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EmbeddingColumn {
    Values(Vec<f32>),
    Text(String),
}

impl EmbeddingColumn {
    pub fn into_values(self) -> Option<Vec<f32>> {
        match self {
            EmbeddingColumn::Values(values) => Some(values),
            EmbeddingColumn::Text(text) => serde_json::from_str(&text).ok(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngredientRow {
    pub id: IngredientId,
    pub name: String,
    pub description: Option<String>,
    pub risk_level: String,
    pub embedding: Option<EmbeddingColumn>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimilarityRow {
    pub id: IngredientId,
    pub name: String,
    pub description: Option<String>,
    pub risk_level: String,
    #[serde(alias = "similarity")]
    pub similarity_score: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngredientNameRow {
    pub id: IngredientId,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileRow {
    pub sensitivities: Option<RawSensitivities>,
}

fn risk_level(id: IngredientId, raw: &str) -> Option<RiskLevel> {
    raw.parse()
        .inspect_err(|e| warn!(id, "Skipping ingredient with {}", e))
        .ok()
}

impl IngredientRow {
    /// Rows without a usable embedding or with an unknown risk level are
    /// dropped.
    pub fn into_entry(self) -> Option<KnowledgeBaseEntry> {
        let risk_level = risk_level(self.id, &self.risk_level)?;
        let embedding = self.embedding.and_then(EmbeddingColumn::into_values)?;

        Some(KnowledgeBaseEntry {
            id: self.id,
            name: self.name,
            description: self.description.unwrap_or_default(),
            risk_level,
            embedding,
        })
    }

    pub fn into_summary(self) -> Option<IngredientSummary> {
        Some(IngredientSummary {
            risk_level: risk_level(self.id, &self.risk_level)?,
            id: self.id,
            name: self.name,
            description: self.description.unwrap_or_default(),
        })
    }
}

impl SimilarityRow {
    pub fn into_result(self) -> Option<SimilarityResult> {
        Some(SimilarityResult {
            risk_level: risk_level(self.id, &self.risk_level)?,
            id: self.id,
            name: self.name,
            description: self.description.unwrap_or_default(),
            similarity_score: self.similarity_score,
        })
    }
}

impl From<IngredientNameRow> for IngredientRef {
    fn from(row: IngredientNameRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}
