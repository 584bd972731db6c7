//! Gemini embeddings over the `batchEmbedContents` REST endpoint.

use async_trait::async_trait;
use primer_core::PrimerError;
use primer_model::GEMINI_API_BASE;
use primer_model::retry::RetryConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

pub const DEFAULT_EMBEDDING_MODEL: &str = "models/text-embedding-004";
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 768;
/// Largest batch the endpoint accepts in one request.
pub const MAX_BATCH_SIZE: usize = 100;

const PROVIDER: &str = "gemini";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchEmbedRequest<'a> {
    requests: Vec<EmbedContentRequest<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedContentRequest<'a> {
    model: &'a str,
    content: EmbedContent<'a>,
    task_type: &'static str,
}

#[derive(Debug, Serialize)]
struct EmbedContent<'a> {
    parts: [EmbedPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct EmbedPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<ContentEmbedding>,
}

#[derive(Debug, Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}

/// [`EmbeddingProvider`] backed by Google's text embedding models.
///
/// Queries are embedded with the `RETRIEVAL_QUERY` task type and batches
/// with `RETRIEVAL_DOCUMENT`.
pub struct GeminiEmbeddingProvider {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    dimensions: usize,
    retry_config: RetryConfig,
}

impl GeminiEmbeddingProvider {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(RagError::ConfigError("Gemini API key is empty".to_string()));
        }
        let http = reqwest::Client::builder().build().map_err(|e| Self::error(e.to_string()))?;
        Ok(Self {
            http,
            api_key,
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            base_url: GEMINI_API_BASE.to_string(),
            dimensions: DEFAULT_EMBEDDING_DIMENSIONS,
            retry_config: RetryConfig::default(),
        })
    }

    /// Use another embedding model. A missing `models/` prefix is added.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>, dimensions: usize) -> Self {
        let model = model.into();
        self.model =
            if model.starts_with("models/") { model } else { format!("models/{model}") };
        self.dimensions = dimensions;
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn error(message: impl Into<String>) -> RagError {
        RagError::EmbeddingError { provider: PROVIDER.to_string(), message: message.into() }
    }

    fn batch_url(&self) -> String {
        format!("{}/{}:batchEmbedContents", self.base_url.trim_end_matches('/'), self.model)
    }

    async fn send_once(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> primer_core::Result<BatchEmbedResponse> {
        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| PrimerError::Model(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(PrimerError::Model(format!("HTTP {}: {}", status.as_u16(), text)));
        }

        response
            .json()
            .await
            .map_err(|e| PrimerError::Model(format!("invalid embedding response: {e}")))
    }

    async fn embed_with_task(
        &self,
        texts: &[String],
        task_type: &'static str,
    ) -> Result<Vec<Vec<f32>>> {
        let url = self.batch_url();
        let mut embeddings = Vec::with_capacity(texts.len());

        for batch in texts.chunks(MAX_BATCH_SIZE) {
            let request = BatchEmbedRequest {
                requests: batch
                    .iter()
                    .map(|text| EmbedContentRequest {
                        model: &self.model,
                        content: EmbedContent { parts: [EmbedPart { text }] },
                        task_type,
                    })
                    .collect(),
            };
            let body = serde_json::to_value(&request)?;

            debug!(model = %self.model, batch = batch.len(), task_type, "requesting embeddings");
            let response = self
                .retry_config
                .run(|| self.send_once(&url, &body))
                .await
                .map_err(|e| Self::error(e.to_string()))?;

            if response.embeddings.len() != batch.len() {
                return Err(Self::error(format!(
                    "expected {} embeddings, got {}",
                    batch.len(),
                    response.embeddings.len()
                )));
            }
            embeddings.extend(response.embeddings.into_iter().map(|e| e.values));
        }

        Ok(embeddings)
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_with_task(&[text.to_string()], "RETRIEVAL_QUERY")
            .await?
            .pop()
            .ok_or_else(|| Self::error("empty embedding response"))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.embed_with_task(texts, "RETRIEVAL_DOCUMENT").await
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
