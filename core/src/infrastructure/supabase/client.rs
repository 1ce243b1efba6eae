use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder};
use serde::{Serialize, de::DeserializeOwned};
use tracing::error;

use crate::domain::common::{SupabaseConfig, entities::app_errors::CoreError};

/// Thin PostgREST client for a Supabase project.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    client: Client,
    rest_url: String,
}

impl SupabaseClient {
    pub fn new(config: &SupabaseConfig) -> Result<Self, CoreError> {
        let key = config.service_key.trim();
        if config.url.trim().is_empty() || key.is_empty() {
            return Err(CoreError::InvalidInput(
                "Supabase URL and service key are required".to_string(),
            ));
        }

        let invalid_key = |_| CoreError::InvalidInput("invalid Supabase service key".to_string());
        let mut headers = HeaderMap::new();
        headers.insert("apikey", HeaderValue::from_str(key).map_err(invalid_key)?);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", key)).map_err(invalid_key)?,
        );

        let client = Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| {
                error!("Failed to build Supabase HTTP client: {}", e);
                CoreError::InternalServerError
            })?;

        Ok(Self {
            client,
            rest_url: format!("{}/rest/v1", config.url.trim().trim_end_matches('/')),
        })
    }

    /// `GET /rest/v1/<table>` with PostgREST filter parameters.
    pub async fn select<T>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, CoreError>
    where
        T: DeserializeOwned,
    {
        let request = self
            .client
            .get(format!("{}/{}", self.rest_url, table))
            .query(query);

        self.execute(request, table).await
    }

    /// `POST /rest/v1/rpc/<function>`.
    pub async fn rpc<B, T>(&self, function: &str, body: &B) -> Result<T, CoreError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .client
            .post(format!("{}/rpc/{}", self.rest_url, function))
            .json(body);

        self.execute(request, function).await
    }

    async fn execute<T>(&self, request: RequestBuilder, target: &str) -> Result<T, CoreError>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await.map_err(|e| {
            error!(resource = target, "Supabase request failed: {}", e);
            if e.is_timeout() {
                CoreError::Timeout(format!("Supabase {}", target))
            } else {
                CoreError::ExternalServiceError(format!("Supabase error: {}", e))
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!(resource = target, "Supabase returned error: {} - {}", status, error_text);
            return Err(CoreError::ExternalServiceError(format!(
                "Supabase returned error: {} - {}",
                status, error_text
            )));
        }

        response.json::<T>().await.map_err(|e| {
            error!(resource = target, "Failed to parse Supabase response: {}", e);
            CoreError::ExternalServiceError(format!("Failed to parse Supabase response: {}", e))
        })
    }
}
