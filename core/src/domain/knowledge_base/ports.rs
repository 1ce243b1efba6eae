use std::future::Future;

use crate::domain::{
    common::entities::app_errors::CoreError,
    knowledge_base::entities::{
        IngredientId, IngredientRef, IngredientSummary, KnowledgeBaseEntry, SearchError,
        SimilarityResult,
    },
};

/// Read-only access to the curated ingredient knowledge base.
#[cfg_attr(test, mockall::automock)]
pub trait KnowledgeBaseRepository: Send + Sync {
    /// Index-accelerated nearest-neighbour search. Only hits scoring at least
    /// `min_score` are returned, best first.
    fn search_nearest(
        &self,
        embedding: Vec<f32>,
        limit: usize,
        min_score: f32,
    ) -> impl Future<Output = Result<Vec<SimilarityResult>, CoreError>> + Send;

    /// Every entry with its embedding, for the linear-scan fallback.
    fn scan_all(&self) -> impl Future<Output = Result<Vec<KnowledgeBaseEntry>, CoreError>> + Send;

    fn lookup_by_ids(
        &self,
        ids: Vec<IngredientId>,
    ) -> impl Future<Output = Result<Vec<IngredientRef>, CoreError>> + Send;

    /// Case-insensitive substring match on ingredient names.
    fn find_by_name(
        &self,
        fragment: String,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<IngredientSummary>, CoreError>> + Send;
}

pub trait IngredientSearchService: Send + Sync {
    fn search_ingredients(
        &self,
        query: String,
        limit: usize,
        risk_filter: Option<String>,
    ) -> impl Future<Output = Result<Vec<SimilarityResult>, SearchError>> + Send;

    fn search_ingredients_by_name(
        &self,
        fragment: String,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<IngredientSummary>, SearchError>> + Send;
}
