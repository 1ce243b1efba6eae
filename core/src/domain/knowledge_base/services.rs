use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument, warn};

use crate::domain::{
    common::{entities::app_errors::CoreError, services::Service, with_deadline},
    embedding::{EmbeddingClient, Embedder},
    ingredient_extraction::VisionClient,
    knowledge_base::{
        cache::SearchCache,
        entities::{
            IngredientSummary, KnowledgeBaseEntry, RiskLevel, SearchError, SimilarityResult,
        },
        ports::{IngredientSearchService, KnowledgeBaseRepository},
        similarity::cosine_similarity,
        value_objects::SearchKey,
    },
    product::ProductCatalog,
    risk_assessment::ChatClient,
    sensitivity::ProfileRepository,
};

pub const DEFAULT_SEARCH_LIMIT: usize = 5;
pub const MAX_SEARCH_LIMIT: usize = 20;
/// Hits scoring below this cosine similarity are never returned.
pub const MIN_SIMILARITY: f32 = 0.1;

/// Limits outside `1..=20` fall back to the default.
pub fn effective_limit(limit: usize) -> usize {
    if (1..=MAX_SEARCH_LIMIT).contains(&limit) {
        limit
    } else {
        DEFAULT_SEARCH_LIMIT
    }
}

/// Unknown filter values are logged and treated as no filter.
pub fn parse_risk_filter(raw: Option<&str>) -> Option<RiskLevel> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }

    match raw.parse::<RiskLevel>() {
        Ok(level) => Some(level),
        Err(e) => {
            warn!(risk_filter = raw, "Ignoring invalid risk filter: {}", e);
            None
        }
    }
}

/// Ranks knowledge-base entries against `query` without any index.
pub fn rank_entries(
    query: &[f32],
    entries: Vec<KnowledgeBaseEntry>,
    limit: usize,
    risk_filter: Option<RiskLevel>,
) -> Vec<SimilarityResult> {
    let mut results: Vec<SimilarityResult> = entries
        .into_iter()
        .filter(|entry| risk_filter.is_none_or(|level| entry.risk_level == level))
        .filter_map(|entry| {
            let score = cosine_similarity(query, &entry.embedding);
            (score >= MIN_SIMILARITY).then(|| SimilarityResult {
                id: entry.id,
                name: entry.name,
                description: entry.description,
                risk_level: entry.risk_level,
                similarity_score: score,
            })
        })
        .collect();

    results.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));
    results.truncate(limit);
    results
}

/// Semantic search over the knowledge base with an index path, a linear-scan
/// fallback and a TTL result cache.
pub struct SimilaritySearch<E, KB> {
    embedder: Embedder<E>,
    repository: Arc<KB>,
    cache: SearchCache,
    deadline: Duration,
}

impl<E, KB> Clone for SimilaritySearch<E, KB> {
    fn clone(&self) -> Self {
        Self {
            embedder: self.embedder.clone(),
            repository: Arc::clone(&self.repository),
            cache: self.cache.clone(),
            deadline: self.deadline,
        }
    }
}

impl<E, KB> SimilaritySearch<E, KB>
where
    E: EmbeddingClient,
    KB: KnowledgeBaseRepository,
{
    pub fn new(
        embedder: Embedder<E>,
        repository: Arc<KB>,
        cache: SearchCache,
        deadline: Duration,
    ) -> Self {
        Self {
            embedder,
            repository,
            cache,
            deadline,
        }
    }

    #[instrument(skip(self), fields(query = query.trim()))]
    pub async fn search(
        &self,
        query: &str,
        limit: usize,
        risk_filter: Option<&str>,
    ) -> Result<Vec<SimilarityResult>, SearchError> {
        let limit = effective_limit(limit);
        let risk_filter = parse_risk_filter(risk_filter);
        let key = SearchKey::new(query, limit, risk_filter);

        if let Some(results) = self.cache.get(&key).await {
            debug!(hits = results.len(), "search cache hit");
            return Ok(results);
        }

        let embedding = self.embedder.embed(&key.query).await?;

        let results = match self.search_index(embedding.to_vec(), limit, risk_filter).await {
            Ok(results) => results,
            Err(index_error) => {
                warn!(
                    "Index search unavailable, falling back to linear scan: {}",
                    index_error
                );
                let entries = with_deadline(
                    self.deadline,
                    "knowledge base scan",
                    self.repository.scan_all(),
                )
                .await
                .map_err(|e| {
                    SearchError::Unavailable(format!(
                        "index search failed ({}), linear scan failed ({})",
                        index_error, e
                    ))
                })?;

                rank_entries(embedding.as_slice(), entries, limit, risk_filter)
            }
        };

        debug!(hits = results.len(), "search completed");
        self.cache.put(key, results.clone()).await;

        Ok(results)
    }

    async fn search_index(
        &self,
        embedding: Vec<f32>,
        limit: usize,
        risk_filter: Option<RiskLevel>,
    ) -> Result<Vec<SimilarityResult>, CoreError> {
        let mut results = with_deadline(
            self.deadline,
            "knowledge base index search",
            self.repository.search_nearest(embedding, limit, MIN_SIMILARITY),
        )
        .await?;

        results.retain(|result| {
            result.similarity_score >= MIN_SIMILARITY
                && risk_filter.is_none_or(|level| result.risk_level == level)
        });
        results.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));
        results.truncate(limit);

        Ok(results)
    }

    /// Case-insensitive name lookup; no embedding involved.
    #[instrument(skip(self))]
    pub async fn search_by_name(
        &self,
        fragment: &str,
        limit: usize,
    ) -> Result<Vec<IngredientSummary>, SearchError> {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            return Err(SearchError::InvalidInput(
                "name fragment cannot be empty".to_string(),
            ));
        }

        let limit = effective_limit(limit);
        with_deadline(
            self.deadline,
            "knowledge base name search",
            self.repository.find_by_name(fragment.to_string(), limit),
        )
        .await
        .map(|mut results| {
            results.truncate(limit);
            results
        })
        .map_err(|e| match e {
            CoreError::InvalidInput(message) => SearchError::InvalidInput(message),
            other => SearchError::Unavailable(other.to_string()),
        })
    }
}

impl<E, KB, P, V, L, PC> IngredientSearchService for Service<E, KB, P, V, L, PC>
where
    E: EmbeddingClient,
    KB: KnowledgeBaseRepository,
    P: ProfileRepository,
    V: VisionClient,
    L: ChatClient,
    PC: ProductCatalog,
{
    async fn search_ingredients(
        &self,
        query: String,
        limit: usize,
        risk_filter: Option<String>,
    ) -> Result<Vec<SimilarityResult>, SearchError> {
        self.search.search(&query, limit, risk_filter.as_deref()).await
    }

    async fn search_ingredients_by_name(
        &self,
        fragment: String,
        limit: usize,
    ) -> Result<Vec<IngredientSummary>, SearchError> {
        self.search.search_by_name(&fragment, limit).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::domain::{
        embedding::EmbeddingCache,
        ingredient_extraction::ports::MockVisionClient,
        knowledge_base::ports::MockKnowledgeBaseRepository,
        risk_assessment::ports::MockChatClient,
        sensitivity::ports::MockProfileRepository,
        testing::{FakeEmbeddingClient, InMemoryKnowledgeBase, sample_entries, test_service},
    };

    fn search_over(
        embeddings: FakeEmbeddingClient,
        kb: InMemoryKnowledgeBase,
    ) -> SimilaritySearch<FakeEmbeddingClient, InMemoryKnowledgeBase> {
        let embedder = Embedder::new(
            Arc::new(embeddings),
            EmbeddingCache::new(),
            Duration::from_secs(1),
        );
        SimilaritySearch::new(
            embedder,
            Arc::new(kb),
            SearchCache::with_defaults(),
            Duration::from_secs(1),
        )
    }

    #[test]
    fn test_effective_limit_clamps_out_of_range() {
        assert_eq!(effective_limit(0), DEFAULT_SEARCH_LIMIT);
        assert_eq!(effective_limit(21), DEFAULT_SEARCH_LIMIT);
        assert_eq!(effective_limit(1), 1);
        assert_eq!(effective_limit(20), 20);
    }

    #[test]
    fn test_parse_risk_filter_ignores_unknown_values() {
        assert_eq!(parse_risk_filter(Some("High")), Some(RiskLevel::High));
        assert_eq!(parse_risk_filter(Some("extreme")), None);
        assert_eq!(parse_risk_filter(Some("high")), None);
        assert_eq!(parse_risk_filter(Some("")), None);
        assert_eq!(parse_risk_filter(None), None);
    }

    #[tokio::test]
    async fn test_search_respects_limit_and_filter() {
        let kb = InMemoryKnowledgeBase::new(sample_entries());
        let search = search_over(FakeEmbeddingClient::standard(), kb);

        let results = search.search("Fragrance", 2, None).await.unwrap();
        assert!(results.len() <= 2);
        assert_eq!(results[0].name, "Fragrance");

        let high = search.search("Fragrance", 20, Some("High")).await.unwrap();
        assert!(!high.is_empty());
        assert!(high.iter().all(|r| r.risk_level == RiskLevel::High));
    }

    #[tokio::test]
    async fn test_search_invalid_filter_behaves_like_no_filter() {
        let kb = InMemoryKnowledgeBase::new(sample_entries());
        let search = search_over(FakeEmbeddingClient::standard(), kb);

        let unfiltered = search.search("Cotton", 5, None).await.unwrap();
        let garbage = search.search("Cotton", 5, Some("Severe")).await.unwrap();

        assert_eq!(unfiltered, garbage);
    }

    #[tokio::test]
    async fn test_search_cache_hit_skips_embedding_backend() {
        let embeddings = FakeEmbeddingClient::standard();
        let calls = embeddings.calls();
        let kb = InMemoryKnowledgeBase::new(sample_entries());
        let index_calls = kb.index_calls();
        let search = search_over(embeddings, kb);

        let first = search.search("Fragrance", 5, None).await.unwrap();
        let second = search.search("Fragrance", 5, None).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(index_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_search_falls_back_to_linear_scan() {
        let kb = InMemoryKnowledgeBase::new(sample_entries()).without_index();
        let scans = kb.scan_calls();
        let search = search_over(FakeEmbeddingClient::standard(), kb);

        let results = search.search("Polyester", 3, None).await.unwrap();

        assert_eq!(results[0].name, "Polyester");
        assert!(results.len() <= 3);
        assert!(results.iter().all(|r| r.similarity_score >= MIN_SIMILARITY));
        assert_eq!(scans.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_search_fails_when_both_paths_fail() {
        let kb = InMemoryKnowledgeBase::new(sample_entries())
            .without_index()
            .without_scan();
        let search = search_over(FakeEmbeddingClient::standard(), kb);

        let err = search.search("Rayon", 5, None).await.unwrap_err();

        assert!(matches!(err, SearchError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_search_propagates_embedding_failure() {
        let kb = InMemoryKnowledgeBase::new(sample_entries());
        let search = search_over(FakeEmbeddingClient::standard(), kb);

        let err = search.search("Unobtainium", 5, None).await.unwrap_err();
        assert!(matches!(err, SearchError::Embedding(_)));

        let err = search.search("  ", 5, None).await.unwrap_err();
        assert!(matches!(err, SearchError::Embedding(_)));
    }

    #[tokio::test]
    async fn test_index_and_scan_agree_on_top_result() {
        for query in ["Fragrance", "Cotton", "Polyester", "Rayon", "Aloe Vera"] {
            let indexed = search_over(
                FakeEmbeddingClient::standard(),
                InMemoryKnowledgeBase::new(sample_entries()),
            );
            let scanned = search_over(
                FakeEmbeddingClient::standard(),
                InMemoryKnowledgeBase::new(sample_entries()).without_index(),
            );

            let a = indexed.search(query, 5, None).await.unwrap();
            let b = scanned.search(query, 5, None).await.unwrap();

            assert_eq!(a[0].id, b[0].id, "top result differs for {query}");
        }
    }

    #[tokio::test]
    async fn test_service_search_passes_raw_filter_through() {
        let service = test_service(
            InMemoryKnowledgeBase::new(sample_entries()),
            MockProfileRepository::new(),
            MockVisionClient::new(),
            MockChatClient::new(),
        );

        let results = service
            .search_ingredients("Cotton".to_string(), 50, Some("Low".to_string()))
            .await
            .unwrap();

        assert!(results.len() <= DEFAULT_SEARCH_LIMIT);
        assert!(results.iter().all(|r| r.risk_level == RiskLevel::Low));
        assert_eq!(results[0].name, "Cotton");
    }

    #[tokio::test]
    async fn test_search_by_name() {
        let kb = InMemoryKnowledgeBase::new(sample_entries());
        let search = search_over(FakeEmbeddingClient::standard(), kb);

        let results = search.search_by_name("fragr", 5).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Fragrance");

        let err = search.search_by_name(" ", 5).await.unwrap_err();
        assert!(matches!(err, SearchError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_search_by_name_keeps_repository_input_errors() {
        let mut repository = MockKnowledgeBaseRepository::new();
        repository.expect_find_by_name().returning(|_, _| {
            Box::pin(async { Err(CoreError::InvalidInput("no searchable characters".to_string())) })
        });
        let embedder = Embedder::new(
            Arc::new(FakeEmbeddingClient::standard()),
            EmbeddingCache::new(),
            Duration::from_secs(1),
        );
        let search = SimilaritySearch::new(
            embedder,
            Arc::new(repository),
            SearchCache::with_defaults(),
            Duration::from_secs(1),
        );

        let err = search.search_by_name("*", 5).await.unwrap_err();

        assert!(matches!(err, SearchError::InvalidInput(_)));
    }
}
