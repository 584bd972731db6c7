use crate::{PrimerError, Result, types::Message};
use async_trait::async_trait;
use futures::stream::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::pin::Pin;

pub type LlmResponseStream = Pin<Box<dyn Stream<Item = Result<LlmResponse>> + Send>>;

#[async_trait]
pub trait Llm: Send + Sync {
    fn name(&self) -> &str;
    async fn generate_content(&self, req: LlmRequest, stream: bool) -> Result<LlmResponseStream>;
}

/// Runs a non-streaming request and returns the final response.
pub async fn generate(llm: &dyn Llm, req: LlmRequest) -> Result<LlmResponse> {
    let mut stream = llm.generate_content(req, false).await?;
    let mut last = None;
    while let Some(item) = stream.next().await {
        last = Some(item?);
    }
    last.ok_or_else(|| PrimerError::Model(format!("{} returned no response", llm.name())))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub config: Option<GenerateContentConfig>,
    /// Function declarations (`{name, description, parameters}`) offered to the model.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateContentConfig {
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub top_k: Option<i32>,
    pub max_output_tokens: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub message: Message,
    pub usage_metadata: Option<UsageMetadata>,
    pub finish_reason: Option<FinishReason>,
    pub partial: bool,
    pub turn_complete: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageMetadata {
    pub prompt_token_count: i32,
    pub candidates_token_count: i32,
    pub total_token_count: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinishReason {
    Stop,
    MaxTokens,
    Safety,
    Recitation,
    Other,
}

impl LlmRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self { model: model.into(), messages, config: None, tools: Vec::new() }
    }

    pub fn with_config(mut self, config: GenerateContentConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_tools(mut self, tools: Vec<serde_json::Value>) -> Self {
        self.tools = tools;
        self
    }
}

impl LlmResponse {
    /// A complete, final response carrying `message`.
    pub fn new(message: Message) -> Self {
        Self {
            message,
            usage_metadata: None,
            finish_reason: Some(FinishReason::Stop),
            partial: false,
            turn_complete: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ToolCall;

    struct FixedLlm;

    #[async_trait]
    impl Llm for FixedLlm {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn generate_content(
            &self,
            _req: LlmRequest,
            _stream: bool,
        ) -> Result<LlmResponseStream> {
            let stream = async_stream::stream! {
                let mut partial = LlmResponse::new(Message::ai("Hel"));
                partial.partial = true;
                partial.turn_complete = false;
                yield Ok(partial);
                yield Ok(LlmResponse::new(Message::ai("Hello")));
            };
            Ok(Box::pin(stream))
        }
    }

    struct SilentLlm;

    #[async_trait]
    impl Llm for SilentLlm {
        fn name(&self) -> &str {
            "silent"
        }

        async fn generate_content(
            &self,
            _req: LlmRequest,
            _stream: bool,
        ) -> Result<LlmResponseStream> {
            Ok(Box::pin(futures::stream::empty::<Result<LlmResponse>>()))
        }
    }

    #[test]
    fn test_llm_request_creation() {
        let req = LlmRequest::new("test-model", vec![Message::human("hi")]);
        assert_eq!(req.model, "test-model");
        assert_eq!(req.messages.len(), 1);
        assert!(req.tools.is_empty());
    }

    #[test]
    fn test_llm_request_with_config() {
        let config = GenerateContentConfig { temperature: Some(0.0), ..Default::default() };
        let req = LlmRequest::new("test-model", vec![]).with_config(config);
        assert_eq!(req.config.unwrap().temperature, Some(0.0));
    }

    #[test]
    fn test_llm_response_creation() {
        let resp = LlmResponse::new(Message::ai_with_tool_calls(
            "",
            vec![ToolCall::new("1", "add", serde_json::json!({}))],
        ));
        assert!(resp.turn_complete);
        assert!(!resp.partial);
        assert_eq!(resp.finish_reason, Some(FinishReason::Stop));
        assert!(resp.message.has_tool_calls());
    }

    #[tokio::test]
    async fn test_generate_returns_final_response() {
        let resp = generate(&FixedLlm, LlmRequest::new("m", vec![])).await.unwrap();
        assert_eq!(resp.message.content(), "Hello");
        assert!(resp.turn_complete);
    }

    #[tokio::test]
    async fn test_generate_empty_stream_is_error() {
        let err = generate(&SilentLlm, LlmRequest::new("m", vec![])).await.unwrap_err();
        assert!(matches!(err, PrimerError::Model(_)));
    }
}
