//! Ready-made pieces for tool-calling loops: [`ToolNode`] and [`tools_condition`].

use crate::edge::END;
use crate::error::Result;
use crate::node::{Node, NodeContext, NodeOutput};
use crate::state::{MESSAGES, State};
use async_trait::async_trait;
use primer_core::{CallContext, Message, PrimerError, Tool, ToolCall, messages_to_value};
use primer_tool::BasicToolset;
use serde_json::Value;
use std::sync::Arc;

/// Route key returned by [`tools_condition`] when the model asked for tools.
pub const TOOLS: &str = "tools";

/// Last message stored in the `messages` channel, if it parses.
pub fn last_message(state: &State) -> Option<Message> {
    let last = state.get(MESSAGES)?.as_array()?.last()?;
    serde_json::from_value(last.clone()).ok()
}

/// Builds an input state holding `messages`.
pub fn messages_input(messages: &[Message]) -> Result<State> {
    Ok(State::from([(MESSAGES.to_string(), messages_to_value(messages)?)]))
}

/// Routes to [`TOOLS`] when the last message is an AI message with tool calls, else to END.
pub fn tools_condition(state: &State) -> String {
    match last_message(state) {
        Some(message) if message.is_ai() && message.has_tool_calls() => TOOLS.to_string(),
        _ => END.to_string(),
    }
}

/// Renders a tool result as message content. Strings are used verbatim.
pub fn tool_output_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Runs every tool call of the last AI message and appends one tool message per call.
///
/// Tool failures and unknown tool names are reported back to the model as
/// message content instead of aborting the run.
pub struct ToolNode {
    name: String,
    toolset: BasicToolset,
}

impl ToolNode {
    pub fn new(name: &str, tools: Vec<Arc<dyn Tool>>) -> Self {
        Self { name: name.to_string(), toolset: BasicToolset::new(name, tools) }
    }

    /// Execute a single call and return its tool message.
    async fn run_call(&self, call: &ToolCall) -> Message {
        let Some(tool) = self.toolset.get(&call.name) else {
            tracing::warn!(tool = %call.name, "model requested an unknown tool");
            let content = format!(
                "Error: {} is not a valid tool, try one of [{}].",
                call.name,
                self.toolset.names().join(", ")
            );
            return Message::tool(&call.id, &call.name, content);
        };

        let ctx = Arc::new(CallContext::new(&call.id, &call.name));
        let content = match tool.execute(ctx, call.args.clone()).await {
            Ok(value) => tool_output_text(&value),
            Err(e) => {
                tracing::warn!(tool = %call.name, error = %e, "tool call failed");
                format!("Error: {e}\n Please fix your mistakes.")
            }
        };
        Message::tool(&call.id, &call.name, content)
    }
}

#[async_trait]
impl Node for ToolNode {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, ctx: &NodeContext) -> Result<NodeOutput> {
        let messages = ctx.messages()?;
        let calls = match messages.last() {
            Some(Message::Ai { tool_calls, .. }) => tool_calls.clone(),
            _ => {
                return Err(PrimerError::Tool(format!(
                    "'{}' expects the last message to be an AI message",
                    self.name
                ))
                .into());
            }
        };

        let mut results = Vec::with_capacity(calls.len());
        for call in &calls {
            results.push(self.run_call(call).await);
        }
        NodeOutput::new().with_messages(&results)
    }
}
