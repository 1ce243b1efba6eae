use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::{NoContext, Timestamp, Uuid};

use crate::domain::common::entities::app_errors::CoreError;

pub mod entities;
pub mod services;

#[derive(Clone, Debug)]
pub struct LotusConfig {
    pub llm: LLMConfig,
    pub supabase: SupabaseConfig,
    pub pipeline: PipelineConfig,
}

#[derive(Clone, Debug)]
pub struct LLMConfig {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub chat_model: String,
    pub vision_model: String,
    pub embedding_model: String,
    pub embedding_dimensions: usize,
    pub max_retries: usize,
    pub request_timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct SupabaseConfig {
    pub url: String,
    pub service_key: String,
    pub request_timeout: Duration,
}

/// Per-call deadlines and cache policy for one pipeline service.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub embedding_timeout: Duration,
    pub search_timeout: Duration,
    pub profile_timeout: Duration,
    pub vision_timeout: Duration,
    pub chat_timeout: Duration,
    pub catalog_timeout: Duration,
    pub search_cache_ttl: Duration,
    pub search_cache_capacity: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            embedding_timeout: Duration::from_secs(15),
            search_timeout: Duration::from_secs(10),
            profile_timeout: Duration::from_secs(5),
            vision_timeout: Duration::from_secs(60),
            chat_timeout: Duration::from_secs(60),
            catalog_timeout: Duration::from_secs(10),
            search_cache_ttl: Duration::from_secs(60 * 60),
            search_cache_capacity: 500,
        }
    }
}

pub fn generate_timestamp() -> (DateTime<Utc>, Timestamp) {
    let now = Utc::now();
    let seconds = now.timestamp().try_into().unwrap_or(0);
    let timestamp = Timestamp::from_unix(NoContext, seconds, now.timestamp_subsec_nanos());

    (now, timestamp)
}

pub fn generate_uuid_v7() -> Uuid {
    let (_, timestamp) = generate_timestamp();
    Uuid::new_v7(timestamp)
}

/// ISO-8601 UTC with microseconds and a `Z` suffix, e.g. `2026-01-31T18:30:00.123456Z`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Runs a collaborator call under its own deadline, turning an elapsed
/// deadline into [`CoreError::Timeout`].
pub async fn with_deadline<T, F>(deadline: Duration, call: &str, fut: F) -> Result<T, CoreError>
where
    F: Future<Output = Result<T, CoreError>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => Err(CoreError::Timeout(format!(
            "{} exceeded {}ms",
            call,
            deadline.as_millis()
        ))),
    }
}
