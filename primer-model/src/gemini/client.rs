use super::config::GeminiConfig;
use super::convert::{GenerateContentResponse, build_request, convert_response};
use crate::retry::RetryConfig;
use async_trait::async_trait;
use primer_core::{Llm, LlmRequest, LlmResponse, LlmResponseStream, PrimerError, Result};

/// Chat model backed by the Gemini `generateContent` REST endpoint.
pub struct GeminiModel {
    http: reqwest::Client,
    config: GeminiConfig,
    retry_config: RetryConfig,
}

impl GeminiModel {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(PrimerError::Config("Gemini API key is empty".to_string()));
        }
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| PrimerError::Model(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, config, retry_config: RetryConfig::default() })
    }

    /// Shorthand for `GeminiModel::new(GeminiConfig::new(api_key, model))`.
    pub fn from_api_key(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        Self::new(GeminiConfig::new(api_key, model))
    }

    #[must_use]
    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    async fn send_once(&self, url: &str, body: &serde_json::Value) -> Result<LlmResponse> {
        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| PrimerError::Model(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(PrimerError::Model(format!("HTTP {}: {}", status.as_u16(), text)));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| PrimerError::Model(format!("invalid Gemini response: {e}")))?;
        convert_response(parsed)
    }
}

#[async_trait]
impl Llm for GeminiModel {
    fn name(&self) -> &str {
        &self.config.model
    }

    /// Gemini replies are not streamed; `stream` still yields one complete response.
    async fn generate_content(&self, req: LlmRequest, _stream: bool) -> Result<LlmResponseStream> {
        let url = self.config.generate_url();
        let body = serde_json::to_value(build_request(&req, self.config.temperature))?;

        primer_telemetry::debug!(
            model = %self.config.model,
            messages = req.messages.len(),
            tools = req.tools.len(),
            "sending generateContent request"
        );

        let response = self.retry_config.run(|| self.send_once(&url, &body)).await?;

        primer_telemetry::debug!(
            tool_calls = response.message.tool_calls().len(),
            finish_reason = ?response.finish_reason,
            "received Gemini response"
        );

        let stream = async_stream::stream! {
            yield Ok(response);
        };
        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_api_key_rejected() {
        let err = GeminiModel::from_api_key("  ", "gemini-2.5-flash").err().unwrap();
        assert!(matches!(err, PrimerError::Config(_)));
    }

    #[test]
    fn test_name_is_model() {
        let model = GeminiModel::from_api_key("key", "gemini-2.5-flash").unwrap();
        assert_eq!(model.name(), "gemini-2.5-flash");
    }
}
