use std::sync::Arc;

use crate::domain::{
    common::PipelineConfig,
    embedding::{EmbeddingCache, EmbeddingClient, Embedder},
    ingredient_extraction::{IngredientExtractor, VisionClient},
    knowledge_base::{KnowledgeBaseRepository, SearchCache, SimilaritySearch},
    product::ProductCatalog,
    risk_assessment::ChatClient,
    sensitivity::{ProfileRepository, SensitivityAccessor},
};

/// The assessment pipeline, generic over its collaborators.
pub struct Service<E, KB, P, V, L, PC> {
    pub(crate) search: SimilaritySearch<E, KB>,
    pub(crate) knowledge_base: Arc<KB>,
    pub(crate) extractor: IngredientExtractor<V>,
    pub(crate) sensitivity_accessor: SensitivityAccessor<P>,
    pub(crate) chat_client: Arc<L>,
    pub(crate) product_catalog: Arc<PC>,
    pub(crate) config: PipelineConfig,
}

impl<E, KB, P, V, L, PC> Clone for Service<E, KB, P, V, L, PC> {
    fn clone(&self) -> Self {
        Self {
            search: self.search.clone(),
            knowledge_base: Arc::clone(&self.knowledge_base),
            extractor: self.extractor.clone(),
            sensitivity_accessor: self.sensitivity_accessor.clone(),
            chat_client: Arc::clone(&self.chat_client),
            product_catalog: Arc::clone(&self.product_catalog),
            config: self.config.clone(),
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
    pub fn new(
        embedding_client: Arc<E>,
        knowledge_base: Arc<KB>,
        profile_repository: Arc<P>,
        vision_client: Arc<V>,
        chat_client: Arc<L>,
        product_catalog: Arc<PC>,
        config: PipelineConfig,
    ) -> Self {
        let search_cache = SearchCache::new(config.search_cache_capacity, config.search_cache_ttl);
        Self::with_caches(
            embedding_client,
            knowledge_base,
            profile_repository,
            vision_client,
            chat_client,
            product_catalog,
            EmbeddingCache::new(),
            search_cache,
            config,
        )
    }

    /// Like [`Service::new`], with caches supplied by the caller so several
    /// services can share them.
    #[allow(clippy::too_many_arguments)]
    pub fn with_caches(
        embedding_client: Arc<E>,
        knowledge_base: Arc<KB>,
        profile_repository: Arc<P>,
        vision_client: Arc<V>,
        chat_client: Arc<L>,
        product_catalog: Arc<PC>,
        embedding_cache: EmbeddingCache,
        search_cache: SearchCache,
        config: PipelineConfig,
    ) -> Self {
        let embedder = Embedder::new(embedding_client, embedding_cache, config.embedding_timeout);
        let search = SimilaritySearch::new(
            embedder,
            Arc::clone(&knowledge_base),
            search_cache,
            config.search_timeout,
        );

        Self {
            search,
            knowledge_base,
            extractor: IngredientExtractor::new(vision_client, config.vision_timeout),
            sensitivity_accessor: SensitivityAccessor::new(
                profile_repository,
                config.profile_timeout,
            ),
            chat_client,
            product_catalog,
            config,
        }
    }
}
