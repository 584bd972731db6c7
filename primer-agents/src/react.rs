//! ReAct: a model that answers arithmetic questions by calling tools.

use std::sync::Arc;

use futures::{Stream, StreamExt};
use primer_core::{Llm, Message, PrimerError, Tool};
use primer_graph::{
    CompiledGraph, END, ExecutionConfig, NodeOutput, START, State, StateGraph, StateSchema,
    StreamEvent, StreamMode, ToolNode, last_message, messages_input,
};
use primer_model::BoundModel;
use primer_tool::{FunctionTool, required_i64};
use schemars::JsonSchema;

use crate::error::{AgentError, Result};

pub const SYSTEM_PROMPT: &str =
    "You are my AI assistant. Please answer my query to the best of your ability.";

pub const DEFAULT_QUERY: &str = "234 + 5678 then multiply the result by 3, finally subtract 1000";

/// Arguments shared by the arithmetic tools.
#[derive(JsonSchema)]
#[allow(dead_code)]
struct IntegerPair {
    a: i64,
    b: i64,
}

fn arithmetic_tool(
    name: &'static str,
    description: &'static str,
    op: fn(i64, i64) -> Option<i64>,
) -> Arc<dyn Tool> {
    Arc::new(
        FunctionTool::new(name, description, move |_ctx, args| async move {
            let a = required_i64(&args, "a")?;
            let b = required_i64(&args, "b")?;
            let value = op(a, b).ok_or_else(|| {
                PrimerError::Tool(format!("{name}({a}, {b}) overflows a 64-bit integer"))
            })?;
            Ok(serde_json::json!(value))
        })
        .with_parameters_schema::<IntegerPair>(),
    )
}

/// `add`, `subtract`, and `multiply` over two integers `a` and `b`.
pub fn math_tools() -> Vec<Arc<dyn Tool>> {
    vec![
        arithmetic_tool("add", "Add two integers.", i64::checked_add),
        arithmetic_tool("subtract", "Subtract two integers.", i64::checked_sub),
        arithmetic_tool("multiply", "Multiply two integers.", i64::checked_mul),
    ]
}

/// `continue` while the model keeps asking for tools, `end` once it answers.
pub fn should_continue(state: &State) -> String {
    match last_message(state) {
        Some(message) if message.has_tool_calls() => "continue".to_string(),
        _ => "end".to_string(),
    }
}

pub fn build_graph(llm: Arc<dyn Llm>) -> Result<CompiledGraph> {
    let tools = math_tools();
    let model = BoundModel::new(llm).bind_tools(&tools).with_system(SYSTEM_PROMPT);

    let graph = StateGraph::new(StateSchema::messages())
        .add_node_fn("our_agent", move |ctx| {
            let model = model.clone();
            async move {
                let response = model.invoke(ctx.messages()?).await?;
                NodeOutput::new().with_messages(&[response])
            }
        })
        .add_node(ToolNode::new("tools", tools))
        .add_edge(START, "our_agent")
        .add_conditional_edges("our_agent", should_continue, [("continue", "tools"), ("end", END)])
        .add_edge("tools", "our_agent")
        .compile()?;
    Ok(graph)
}

pub struct ReactAgent {
    graph: CompiledGraph,
}

impl ReactAgent {
    pub fn new(llm: Arc<dyn Llm>) -> Result<Self> {
        Ok(Self { graph: build_graph(llm)? })
    }

    pub fn graph(&self) -> &CompiledGraph {
        &self.graph
    }

    /// Streams the newest message of every state snapshot, starting with the query itself.
    pub fn run_stream<'a>(&'a self, query: &str) -> impl Stream<Item = Result<Message>> + 'a {
        let query = query.to_string();
        async_stream::try_stream! {
            let input = messages_input(&[Message::human(query)]).map_err(AgentError::from)?;
            let events = self.graph.stream(input, ExecutionConfig::default(), StreamMode::Values);
            futures::pin_mut!(events);
            while let Some(event) = events.next().await {
                let event = event.map_err(AgentError::from)?;
                if !matches!(event, StreamEvent::Values { .. }) {
                    continue;
                }
                if let Some(message) = event.last_message() {
                    yield message;
                }
            }
        }
    }
}
