use primer_core::{Llm, LlmRequest, LlmResponse, LlmResponseStream, Message, PrimerError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Scripted model for tests.
///
/// Each call pops the next queued response or error. Once the queue is
/// exhausted every call answers with an empty AI message. Requests are
/// recorded in call order, failed ones included.
pub struct MockLlm {
    name: String,
    responses: Mutex<VecDeque<Result<LlmResponse>>>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl MockLlm {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_response(self, response: LlmResponse) -> Self {
        self.responses.lock().unwrap_or_else(|e| e.into_inner()).push_back(Ok(response));
        self
    }

    /// Queues a failed call.
    pub fn with_error(self, error: PrimerError) -> Self {
        self.responses.lock().unwrap_or_else(|e| e.into_inner()).push_back(Err(error));
        self
    }

    pub fn with_message(self, message: Message) -> Self {
        self.with_response(LlmResponse::new(message))
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl Llm for MockLlm {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate_content(&self, req: LlmRequest, _stream: bool) -> Result<LlmResponseStream> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).push(req);
        let response = self
            .responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| Ok(LlmResponse::new(Message::ai(""))))?;
        let stream = async_stream::stream! {
            yield Ok(response);
        };
        Ok(Box::pin(stream))
    }
}
