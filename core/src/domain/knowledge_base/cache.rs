use std::time::Duration;

use moka::future::Cache;

use crate::domain::knowledge_base::{entities::SimilarityResult, value_objects::SearchKey};

/// Bounded, time-expiring cache of final search result lists.
#[derive(Clone)]
pub struct SearchCache {
    cache: Cache<SearchKey, Vec<SimilarityResult>>,
}

impl SearchCache {
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .time_to_live(ttl)
            .max_capacity(max_capacity)
            .build();

        Self { cache }
    }

    /// 500 entries, one hour TTL.
    pub fn with_defaults() -> Self {
        Self::new(500, Duration::from_secs(60 * 60))
    }

    pub async fn get(&self, key: &SearchKey) -> Option<Vec<SimilarityResult>> {
        self.cache.get(key).await
    }

    pub async fn put(&self, key: SearchKey, results: Vec<SimilarityResult>) {
        self.cache.insert(key, results).await;
    }
}

impl std::fmt::Debug for SearchCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchCache")
            .field("cache", &"<moka cache>")
            .finish()
    }
}
