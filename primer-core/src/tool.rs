use crate::Result;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;

    /// JSON schema of the arguments object, if the tool takes arguments.
    fn parameters_schema(&self) -> Option<Value> {
        None
    }

    /// Function declaration offered to the model.
    fn declaration(&self) -> Value {
        let mut decl = json!({
            "name": self.name(),
            "description": self.description(),
        });
        if let Some(schema) = self.parameters_schema() {
            decl["parameters"] = schema;
        }
        decl
    }

    async fn execute(&self, ctx: Arc<dyn ToolContext>, args: Value) -> Result<Value>;
}

pub trait ToolContext: Send + Sync {
    fn function_call_id(&self) -> &str;
    fn tool_name(&self) -> &str;
}

/// Context handed to a tool for one model-requested call.
#[derive(Debug, Clone)]
pub struct CallContext {
    function_call_id: String,
    tool_name: String,
}

impl CallContext {
    pub fn new(function_call_id: impl Into<String>, tool_name: impl Into<String>) -> Self {
        Self { function_call_id: function_call_id.into(), tool_name: tool_name.into() }
    }
}

impl ToolContext for CallContext {
    fn function_call_id(&self) -> &str {
        &self.function_call_id
    }

    fn tool_name(&self) -> &str {
        &self.tool_name
    }
}
