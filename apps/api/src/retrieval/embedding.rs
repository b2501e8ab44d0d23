//! Embedding provider: turns batches of text into vectors.
//!
//! `VectorIndex` only talks to the `EmbeddingProvider` trait. The default
//! backend is `OpenAiEmbedder`, which targets any OpenAI-compatible
//! `/embeddings` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::EmbeddingConfig;

const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Embedding API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Embedding response has wrong shape: {0}")]
    Shape(String),

    #[error("Embedding client misconfigured: {0}")]
    Config(String),
}

/// The embedding collaborator. Every call within a process lifetime must
/// return vectors from the same embedding space.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Identifier of the embedding model behind this provider.
    fn model(&self) -> &str;

    /// Embeds `texts` and returns one vector per input, in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}

// ────────────────────────────────────────────────────────────────────────────
// OpenAiEmbedder
// ────────────────────────────────────────────────────────────────────────────

/// Async client for OpenAI-compatible embedding endpoints.
///
/// Inputs larger than `batch_size` are split into several requests; the
/// caller still sees a single batch in, a single batch out.
#[derive(Clone)]
pub struct OpenAiEmbedder {
    client: Client,
    endpoint: String,
    model: String,
    batch_size: usize,
}

impl OpenAiEmbedder {
    pub fn new(config: &EmbeddingConfig) -> Result<Self, EmbeddingError> {
        if config.api_key.trim().is_empty() {
            return Err(EmbeddingError::Config("missing embedding API key".to_string()));
        }
        if config.model.trim().is_empty() {
            return Err(EmbeddingError::Config("missing embedding model name".to_string()));
        }
        if config.batch_size == 0 {
            return Err(EmbeddingError::Config(
                "batch_size must be at least 1".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        let auth = format!("Bearer {}", config.api_key.trim());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth)
                .map_err(|_| EmbeddingError::Config("invalid embedding API key".to_string()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/embeddings", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            batch_size: config.batch_size,
        })
    }

    /// Sends one request of at most `batch_size` inputs.
    async fn embed_request(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let request_body = EmbeddingRequest {
            model: &self.model,
            input: inputs,
        };

        let mut last_error: Option<EmbeddingError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = Duration::from_millis(500 * (1 << attempt));
                warn!(
                    "Embedding call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self
                .client
                .post(&self.endpoint)
                .json(&request_body)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) if e.is_timeout() || e.is_connect() => {
                    last_error = Some(EmbeddingError::Http(e));
                    continue;
                }
                Err(e) => return Err(EmbeddingError::Http(e)),
            };

            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Embedding API returned {}: {}", status, body);
                last_error = Some(EmbeddingError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(EmbeddingError::Api {
                    status: status.as_u16(),
                    message: body,
                });
            }

            let mut parsed: EmbeddingResponse = response.json().await?;
            parsed.data.sort_by_key(|entry| entry.index);

            if parsed.data.len() != inputs.len() {
                return Err(EmbeddingError::Shape(format!(
                    "provider returned {} embeddings for {} inputs",
                    parsed.data.len(),
                    inputs.len()
                )));
            }

            return Ok(parsed.data.into_iter().map(|d| d.embedding).collect());
        }

        Err(last_error.unwrap_or_else(|| {
            EmbeddingError::Shape("embedding request produced no response".to_string())
        }))
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbedder {
    fn model(&self) -> &str {
        &self.model
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            let embedded = self.embed_request(batch).await?;
            vectors.extend(embedded);
        }
        debug!(
            "Embedded {} texts with model {} ({} requests)",
            texts.len(),
            self.model,
            texts.len().div_ceil(self.batch_size)
        );
        Ok(vectors)
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}
