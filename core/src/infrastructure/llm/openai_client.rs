use std::time::Duration;

use base64::{Engine as _, engine::general_purpose};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, error, warn};

use crate::domain::{
    common::{LLMConfig, entities::app_errors::CoreError},
    embedding::EmbeddingClient,
    ingredient_extraction::VisionClient,
    risk_assessment::ChatClient,
};

const MAX_TOKENS: u32 = 1024;
const TEMPERATURE: f32 = 0.7;

/// OpenAI REST client serving embeddings, vision extraction and chat
/// completions.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    chat_model: String,
    vision_model: String,
    embedding_model: String,
    embedding_dimensions: usize,
    max_retries: usize,
    retry_backoff_base: Duration,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
    dimensions: usize,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: MessageContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenAiClient {
    pub fn new(config: &LLMConfig) -> Result<Self, CoreError> {
        if config.openai_api_key.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "missing OpenAI API key".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {}", config.openai_api_key.trim()))
            .map_err(|_| CoreError::InvalidInput("invalid OpenAI API key".to_string()))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| {
                error!("Failed to build OpenAI HTTP client: {}", e);
                CoreError::InternalServerError
            })?;

        Ok(Self {
            client,
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            chat_model: config.chat_model.clone(),
            vision_model: config.vision_model.clone(),
            embedding_model: config.embedding_model.clone(),
            embedding_dimensions: config.embedding_dimensions,
            max_retries: config.max_retries,
            retry_backoff_base: Duration::from_millis(500),
        })
    }

    pub fn with_retry_backoff(mut self, base: Duration) -> Self {
        self.retry_backoff_base = base;
        self
    }

    fn should_retry(status: StatusCode) -> bool {
        status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
    }

    fn is_retryable_error(err: &reqwest::Error) -> bool {
        err.is_timeout() || err.is_connect() || err.is_request()
    }

    /// Wait before retry number `retry` (1-based): the base, doubled per
    /// earlier retry, at most 5 times.
    fn retry_backoff(&self, retry: usize) -> Duration {
        let doublings = retry.saturating_sub(1).min(5) as u32;
        self.retry_backoff_base * (1 << doublings)
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, CoreError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut attempt = 0usize;

        loop {
            match self.client.post(&url).json(body).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response.json::<R>().await.map_err(|e| {
                            error!("Failed to parse OpenAI response from {}: {}", path, e);
                            CoreError::ExternalServiceError(format!(
                                "Failed to parse LLM response: {}",
                                e
                            ))
                        });
                    }

                    let error_text = response.text().await.unwrap_or_default();
                    if Self::should_retry(status) && attempt + 1 < self.max_retries {
                        attempt += 1;
                        warn!(path, %status, attempt, "OpenAI request failed, retrying");
                        tokio::time::sleep(self.retry_backoff(attempt)).await;
                        continue;
                    }

                    error!("OpenAI API error: {} - {}", status, error_text);
                    return Err(CoreError::ExternalServiceError(format!(
                        "LLM API returned error: {} - {}",
                        status, error_text
                    )));
                }
                Err(e) => {
                    if Self::is_retryable_error(&e) && attempt + 1 < self.max_retries {
                        attempt += 1;
                        warn!(path, attempt, "OpenAI request error, retrying: {}", e);
                        tokio::time::sleep(self.retry_backoff(attempt)).await;
                        continue;
                    }

                    error!("OpenAI API request failed: {}", e);
                    return Err(CoreError::ExternalServiceError(format!(
                        "LLM API error: {}",
                        e
                    )));
                }
            }
        }
    }

    async fn chat(&self, request: ChatRequest<'_>) -> Result<String, CoreError> {
        let response: ChatResponse = self.post_json("/chat/completions", &request).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| CoreError::ExternalServiceError("No response from LLM".to_string()))
    }
}

impl EmbeddingClient for OpenAiClient {
    async fn embed(&self, text: String) -> Result<Vec<f32>, CoreError> {
        let request = EmbeddingRequest {
            model: &self.embedding_model,
            input: &text,
            dimensions: self.embedding_dimensions,
        };

        let response: EmbeddingResponse = self.post_json("/embeddings", &request).await?;
        let embedding = response
            .data
            .into_iter()
            .next()
            .map(|data| data.embedding)
            .ok_or_else(|| {
                CoreError::ExternalServiceError("No embedding in response".to_string())
            })?;

        if embedding.len() != self.embedding_dimensions {
            error!(
                expected = self.embedding_dimensions,
                got = embedding.len(),
                "Embedding dimension mismatch"
            );
            return Err(CoreError::ExternalServiceError(format!(
                "expected {}-dimensional embedding, got {}",
                self.embedding_dimensions,
                embedding.len()
            )));
        }

        debug!(dimensions = embedding.len(), "generated embedding");
        Ok(embedding)
    }
}

impl VisionClient for OpenAiClient {
    async fn extract_text(
        &self,
        image: Vec<u8>,
        mime_type: String,
        instruction: String,
    ) -> Result<String, CoreError> {
        let base64_image = general_purpose::STANDARD.encode(&image);

        let request = ChatRequest {
            model: &self.vision_model,
            messages: vec![Message {
                role: "user",
                content: MessageContent::Parts(vec![
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: format!("data:{};base64,{}", mime_type, base64_image),
                        },
                    },
                    ContentPart::Text { text: instruction },
                ]),
            }],
            max_tokens: MAX_TOKENS,
            temperature: None,
        };

        self.chat(request).await
    }
}

impl ChatClient for OpenAiClient {
    async fn complete(
        &self,
        system_prompt: String,
        user_prompt: String,
    ) -> Result<String, CoreError> {
        let request = ChatRequest {
            model: &self.chat_model,
            messages: vec![
                Message {
                    role: "system",
                    content: MessageContent::Text(system_prompt),
                },
                Message {
                    role: "user",
                    content: MessageContent::Text(user_prompt),
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: Some(TEMPERATURE),
        };

        self.chat(request).await
    }
}
