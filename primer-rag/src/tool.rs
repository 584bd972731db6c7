//! Retrieval exposed as a model-callable tool.

use std::sync::Arc;

use async_trait::async_trait;
use primer_core::{PrimerError, Tool, ToolContext};
use serde_json::{Value, json};
use tracing::debug;

use crate::retriever::Retriever;

pub const RETRIEVE_TOOL_NAME: &str = "retrieve_tool";

/// Searches a document collection and returns the matching passages as text.
pub struct RetrieveTool {
    retriever: Retriever,
    corpus: String,
    description: String,
}

impl RetrieveTool {
    /// `corpus` names the indexed document, e.g. `Stock Market Performance 2024`.
    pub fn new(retriever: Retriever, corpus: impl Into<String>) -> Self {
        let corpus = corpus.into();
        let description =
            format!("This tool searches and returns the information from the {corpus} document.");
        Self { retriever, corpus, description }
    }

    /// Retrieved passages formatted as `Document {i}:` blocks, or a
    /// not-found sentence when nothing matches.
    pub async fn retrieve(&self, query: &str) -> primer_core::Result<String> {
        let results = self.retriever.invoke(query).await?;
        debug!(query, results = results.len(), "retrieved passages");

        if results.is_empty() {
            return Ok(format!("I found no relevant information in the {} document.", self.corpus));
        }
        Ok(results
            .iter()
            .enumerate()
            .map(|(i, result)| format!("Document {}:\n{}\n", i + 1, result.chunk.text))
            .collect::<Vec<_>>()
            .join("\n\n"))
    }
}

#[async_trait]
impl Tool for RetrieveTool {
    fn name(&self) -> &str {
        RETRIEVE_TOOL_NAME
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters_schema(&self) -> Option<Value> {
        Some(json!({
            "type": "object",
            "properties": {
                "query": { "type": "string" }
            },
            "required": ["query"]
        }))
    }

    async fn execute(&self, _ctx: Arc<dyn ToolContext>, args: Value) -> primer_core::Result<Value> {
        let query = args
            .get("query")
            .and_then(Value::as_str)
            .ok_or_else(|| PrimerError::Tool("missing argument 'query'".to_string()))?;
        Ok(Value::String(self.retrieve(query).await?))
    }
}
