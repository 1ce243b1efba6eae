//! In-memory collaborators shared by the pipeline tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::{
    common::{PipelineConfig, entities::app_errors::CoreError, services::Service},
    embedding::{EmbeddingCache, ports::EmbeddingClient},
    ingredient_extraction::ports::MockVisionClient,
    knowledge_base::{
        cache::SearchCache,
        entities::{
            IngredientId, IngredientRef, IngredientSummary, KnowledgeBaseEntry, RiskLevel,
            SimilarityResult,
        },
        ports::KnowledgeBaseRepository,
        similarity::cosine_similarity,
    },
    product::ports::MockProductCatalog,
    risk_assessment::ports::MockChatClient,
    sensitivity::ports::MockProfileRepository,
};

fn entry(
    id: IngredientId,
    name: &str,
    risk_level: RiskLevel,
    embedding: [f32; 6],
) -> KnowledgeBaseEntry {
    KnowledgeBaseEntry {
        id,
        name: name.to_string(),
        description: format!("{name} description"),
        risk_level,
        embedding: embedding.to_vec(),
    }
}

pub fn sample_entries() -> Vec<KnowledgeBaseEntry> {
    vec![
        entry(1, "Fragrance", RiskLevel::High, [1.0, 0.0, 0.0, 0.0, 0.0, 0.1]),
        entry(2, "Cotton", RiskLevel::Low, [0.0, 1.0, 0.0, 0.0, 0.0, 0.1]),
        entry(3, "Polyester", RiskLevel::Medium, [0.0, 0.0, 1.0, 0.0, 0.0, 0.1]),
        entry(4, "Rayon", RiskLevel::Medium, [0.0, 0.0, 0.2, 1.0, 0.0, 0.1]),
        entry(5, "Aloe Vera", RiskLevel::Low, [0.0, 0.3, 0.0, 0.0, 1.0, 0.1]),
        entry(6, "Parabens", RiskLevel::High, [0.6, 0.0, 0.0, 0.0, 0.0, 1.0]),
    ]
}

/// Embeds every known ingredient name as its knowledge-base vector and
/// fails on anything else.
pub struct FakeEmbeddingClient {
    vectors: HashMap<String, Vec<f32>>,
    calls: Arc<AtomicUsize>,
}

impl FakeEmbeddingClient {
    pub fn standard() -> Self {
        let vectors = sample_entries()
            .into_iter()
            .map(|entry| (entry.name, entry.embedding))
            .collect();

        Self {
            vectors,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl EmbeddingClient for FakeEmbeddingClient {
    async fn embed(&self, text: String) -> Result<Vec<f32>, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.vectors
            .get(&text)
            .cloned()
            .ok_or_else(|| CoreError::ExternalServiceError(format!("no vector for {text}")))
    }
}

pub struct InMemoryKnowledgeBase {
    entries: Vec<KnowledgeBaseEntry>,
    index_available: bool,
    scan_available: bool,
    lookup_available: bool,
    index_calls: Arc<AtomicUsize>,
    scan_calls: Arc<AtomicUsize>,
}

impl InMemoryKnowledgeBase {
    pub fn new(entries: Vec<KnowledgeBaseEntry>) -> Self {
        Self {
            entries,
            index_available: true,
            scan_available: true,
            lookup_available: true,
            index_calls: Arc::new(AtomicUsize::new(0)),
            scan_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn without_index(mut self) -> Self {
        self.index_available = false;
        self
    }

    pub fn without_scan(mut self) -> Self {
        self.scan_available = false;
        self
    }

    pub fn without_lookup(mut self) -> Self {
        self.lookup_available = false;
        self
    }

    pub fn index_calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.index_calls)
    }

    pub fn scan_calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.scan_calls)
    }
}

impl KnowledgeBaseRepository for InMemoryKnowledgeBase {
    async fn search_nearest(
        &self,
        embedding: Vec<f32>,
        limit: usize,
        min_score: f32,
    ) -> Result<Vec<SimilarityResult>, CoreError> {
        self.index_calls.fetch_add(1, Ordering::SeqCst);
        if !self.index_available {
            return Err(CoreError::ExternalServiceError(
                "search_ingredients rpc missing".to_string(),
            ));
        }

        let mut results: Vec<SimilarityResult> = self
            .entries
            .iter()
            .map(|entry| SimilarityResult {
                id: entry.id,
                name: entry.name.clone(),
                description: entry.description.clone(),
                risk_level: entry.risk_level,
                similarity_score: cosine_similarity(&embedding, &entry.embedding),
            })
            .filter(|result| result.similarity_score >= min_score)
            .collect();
        results.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));
        results.truncate(limit);

        Ok(results)
    }

    async fn scan_all(&self) -> Result<Vec<KnowledgeBaseEntry>, CoreError> {
        self.scan_calls.fetch_add(1, Ordering::SeqCst);
        if !self.scan_available {
            return Err(CoreError::ExternalServiceError(
                "ingredients_library unreachable".to_string(),
            ));
        }

        Ok(self.entries.clone())
    }

    async fn lookup_by_ids(&self, ids: Vec<IngredientId>) -> Result<Vec<IngredientRef>, CoreError> {
        if !self.lookup_available {
            return Err(CoreError::Timeout("ingredient lookup".to_string()));
        }

        Ok(self
            .entries
            .iter()
            .filter(|entry| ids.contains(&entry.id))
            .map(|entry| IngredientRef {
                id: entry.id,
                name: entry.name.clone(),
            })
            .collect())
    }

    async fn find_by_name(
        &self,
        fragment: String,
        limit: usize,
    ) -> Result<Vec<IngredientSummary>, CoreError> {
        let needle = fragment.to_lowercase();
        Ok(self
            .entries
            .iter()
            .filter(|entry| entry.name.to_lowercase().contains(&needle))
            .take(limit)
            .map(|entry| IngredientSummary {
                id: entry.id,
                name: entry.name.clone(),
                description: entry.description.clone(),
                risk_level: entry.risk_level,
            })
            .collect())
    }
}

pub type TestService = Service<
    FakeEmbeddingClient,
    InMemoryKnowledgeBase,
    MockProfileRepository,
    MockVisionClient,
    MockChatClient,
    MockProductCatalog,
>;

pub fn test_service(
    knowledge_base: InMemoryKnowledgeBase,
    profile_repository: MockProfileRepository,
    vision_client: MockVisionClient,
    chat_client: MockChatClient,
) -> TestService {
    test_service_with_catalog(
        knowledge_base,
        profile_repository,
        vision_client,
        chat_client,
        MockProductCatalog::new(),
    )
}

pub fn test_service_with_catalog(
    knowledge_base: InMemoryKnowledgeBase,
    profile_repository: MockProfileRepository,
    vision_client: MockVisionClient,
    chat_client: MockChatClient,
    product_catalog: MockProductCatalog,
) -> TestService {
    let config = PipelineConfig::default();
    Service::with_caches(
        Arc::new(FakeEmbeddingClient::standard()),
        Arc::new(knowledge_base),
        Arc::new(profile_repository),
        Arc::new(vision_client),
        Arc::new(chat_client),
        Arc::new(product_catalog),
        EmbeddingCache::new(),
        SearchCache::new(config.search_cache_capacity, config.search_cache_ttl),
        config,
    )
}
