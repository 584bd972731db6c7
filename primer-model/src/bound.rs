//! A model with tools and an optional system prompt attached.

use primer_core::{GenerateContentConfig, Llm, LlmRequest, Message, Result, Tool, generate};
use serde_json::Value;
use std::sync::Arc;

/// Wraps an [`Llm`] so every call offers the same tool declarations.
///
/// ```rust
/// use primer_core::Message;
/// use primer_model::{BoundModel, MockLlm};
/// use std::sync::Arc;
///
/// let model = BoundModel::new(Arc::new(MockLlm::new("mock"))).with_system("Be brief.");
/// let req = model.request(vec![Message::human("hi")]);
/// assert_eq!(req.messages.len(), 2);
/// ```
#[derive(Clone)]
pub struct BoundModel {
    llm: Arc<dyn Llm>,
    declarations: Vec<Value>,
    system: Option<String>,
    config: Option<GenerateContentConfig>,
}

impl BoundModel {
    pub fn new(llm: Arc<dyn Llm>) -> Self {
        Self { llm, declarations: Vec::new(), system: None, config: None }
    }

    /// Offer `tools` to the model on every request.
    #[must_use]
    pub fn bind_tools(mut self, tools: &[Arc<dyn Tool>]) -> Self {
        self.declarations = tools.iter().map(|t| t.declaration()).collect();
        self
    }

    /// Prepend a system message to every request.
    #[must_use]
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: GenerateContentConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn declarations(&self) -> &[Value] {
        &self.declarations
    }

    pub fn llm(&self) -> &Arc<dyn Llm> {
        &self.llm
    }

    /// Build the request for `messages` without sending it.
    pub fn request(&self, messages: Vec<Message>) -> LlmRequest {
        let messages = match &self.system {
            Some(system) => {
                std::iter::once(Message::system(system.clone())).chain(messages).collect()
            }
            None => messages,
        };
        let mut req =
            LlmRequest::new(self.llm.name(), messages).with_tools(self.declarations.clone());
        req.config = self.config.clone();
        req
    }

    /// Send `messages` and return the model's reply.
    pub async fn invoke(&self, messages: Vec<Message>) -> Result<Message> {
        let response = generate(self.llm.as_ref(), self.request(messages)).await?;
        Ok(response.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockLlm;
    use async_trait::async_trait;
    use primer_core::ToolContext;
    use serde_json::json;

    struct Echo;

    #[async_trait]
    impl Tool for Echo {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Echo the input."
        }
        async fn execute(&self, _ctx: Arc<dyn ToolContext>, args: Value) -> Result<Value> {
            Ok(args)
        }
    }

    #[tokio::test]
    async fn test_invoke_sends_system_and_tools() {
        let mock = Arc::new(MockLlm::new("mock").with_message(Message::ai("pong")));
        let tools: Vec<Arc<dyn Tool>> = vec![Arc::new(Echo)];
        let model = BoundModel::new(mock.clone())
            .bind_tools(&tools)
            .with_system("system prompt")
            .with_config(GenerateContentConfig { temperature: Some(0.0), ..Default::default() });

        let reply = model.invoke(vec![Message::human("ping")]).await.unwrap();
        assert_eq!(reply.content(), "pong");

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        let req = &requests[0];
        assert_eq!(req.model, "mock");
        assert_eq!(req.messages[0], Message::system("system prompt"));
        assert_eq!(req.messages[1], Message::human("ping"));
        assert_eq!(req.tools, vec![json!({"name": "echo", "description": "Echo the input."})]);
        assert_eq!(req.config.as_ref().and_then(|c| c.temperature), Some(0.0));
    }
}
