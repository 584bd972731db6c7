//! Drafter: edits a single in-memory document through `update` and `save` tools.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::StreamExt;
use primer_core::{Llm, Message, Tool};
use primer_graph::{
    CompiledGraph, END, ExecutionConfig, NodeOutput, START, StateGraph, StateSchema,
    StreamEvent, StreamMode, TOOLS, ToolNode, messages_input, tools_condition,
};
use primer_model::BoundModel;
use primer_tool::{FunctionTool, required_str};
use schemars::JsonSchema;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::Result;

pub const QUIT_WORD: &str = "quit";
pub const GREETING: &str = "I'm ready. What would you like to do?";

/// Tool results containing this end the session.
const SAVED_MARKER: &str = "saved to";

pub fn is_quit(input: &str) -> bool {
    input.eq_ignore_ascii_case(QUIT_WORD)
}

/// The document being drafted, shared between the tools and the prompt.
#[derive(Clone, Debug)]
pub struct DocumentStore {
    content: Arc<RwLock<String>>,
    output_dir: PathBuf,
}

impl DocumentStore {
    /// An empty document saved under `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self { content: Arc::new(RwLock::new(String::new())), output_dir: output_dir.into() }
    }

    pub async fn content(&self) -> String {
        self.content.read().await.clone()
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub async fn update(&self, content: &str) -> String {
        *self.content.write().await = content.to_string();
        format!("Document updated. Current content:\n{content}")
    }

    /// Write the document to `filename`, adding `.txt` when missing.
    ///
    /// Failures are reported in the returned text rather than as an error.
    pub async fn save(&self, filename: &str) -> String {
        let filename = if filename.ends_with(".txt") {
            filename.to_string()
        } else {
            format!("{filename}.txt")
        };
        let path = self.output_dir.join(&filename);
        let content = self.content().await;
        match tokio::fs::write(&path, content).await {
            Ok(()) => {
                info!(path = %path.display(), "document saved");
                format!("Document saved to {filename}.")
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to save document");
                format!("Failed to save: {e}")
            }
        }
    }
}

#[derive(JsonSchema)]
#[allow(dead_code)]
struct UpdateArgs {
    content: String,
}

#[derive(JsonSchema)]
#[allow(dead_code)]
struct SaveArgs {
    filename: String,
}

pub fn drafter_tools(store: &DocumentStore) -> Vec<Arc<dyn Tool>> {
    let update_store = store.clone();
    let save_store = store.clone();
    vec![
        Arc::new(
            FunctionTool::new("update", "Update the document with new content.", move |_ctx, args| {
                let store = update_store.clone();
                async move {
                    let content = required_str(&args, "content")?;
                    Ok(Value::String(store.update(content).await))
                }
            })
            .with_parameters_schema::<UpdateArgs>(),
        ),
        Arc::new(
            FunctionTool::new("save", "Save the document to a file.", move |_ctx, args| {
                let store = save_store.clone();
                async move { Ok(Value::String(store.save(required_str(&args, "filename")?).await)) }
            })
            .with_parameters_schema::<SaveArgs>(),
        ),
    ]
}

pub fn system_prompt(document: &str) -> String {
    format!(
        "You are Drafter.\n\
         Current Document Content:\n\
         ---\n\
         {document}\n\
         ---\n\
         If user wants to update, use 'update' tool.\n\
         If user wants to save, use 'save' tool."
    )
}

/// START -> `agent`, then `tools` and back while the model calls tools.
///
/// The system prompt is rebuilt on every model call so it always shows the
/// current document.
pub fn build_graph(llm: Arc<dyn Llm>, store: DocumentStore) -> Result<CompiledGraph> {
    let tools = drafter_tools(&store);
    let model = BoundModel::new(llm).bind_tools(&tools);

    let graph = StateGraph::new(StateSchema::messages())
        .add_node_fn("agent", move |ctx| {
            let model = model.clone();
            let store = store.clone();
            async move {
                let prompt = system_prompt(&store.content().await);
                let response = model.with_system(prompt).invoke(ctx.messages()?).await?;
                NodeOutput::new().with_messages(&[response])
            }
        })
        .add_node(ToolNode::new(TOOLS, tools))
        .add_edge(START, "agent")
        .add_conditional_edges("agent", tools_condition, [(TOOLS, TOOLS), (END, END)])
        .add_edge(TOOLS, "agent")
        .compile()?;
    Ok(graph)
}

/// What happened during one drafter turn, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrafterEvent {
    /// Non-empty text from the model.
    AiText(String),
    /// The model requested these tools.
    ToolsUsed(Vec<String>),
    ToolResult(String),
    /// The document was saved; the session is over.
    Saved,
}

pub struct DrafterSession {
    graph: CompiledGraph,
    store: DocumentStore,
    history: Vec<Message>,
    finished: bool,
}

impl DrafterSession {
    pub fn new(llm: Arc<dyn Llm>, store: DocumentStore) -> Result<Self> {
        let graph = build_graph(llm, store.clone())?;
        Ok(Self { graph, store, history: Vec::new(), finished: false })
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// True once a save succeeded.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Run one user turn, streaming node updates into the history.
    ///
    /// Stops as soon as a tool result reports a save.
    pub async fn send(&mut self, text: &str) -> Result<Vec<DrafterEvent>> {
        self.history.push(Message::human(text));
        let input = messages_input(&self.history)?;

        let mut events = Vec::new();
        let stream = self.graph.stream(input, ExecutionConfig::default(), StreamMode::Updates);
        futures::pin_mut!(stream);

        while let Some(event) = stream.next().await {
            let event = event?;
            if !matches!(event, StreamEvent::Updates { .. }) {
                continue;
            }
            let Some(new_messages) = event.messages() else {
                continue;
            };
            self.history.extend(new_messages.iter().cloned());

            for message in new_messages {
                match message {
                    Message::Ai { content, tool_calls } => {
                        if !content.trim().is_empty() {
                            events.push(DrafterEvent::AiText(content));
                        }
                        if !tool_calls.is_empty() {
                            events.push(DrafterEvent::ToolsUsed(
                                tool_calls.into_iter().map(|call| call.name).collect(),
                            ));
                        }
                    }
                    Message::Tool { content, .. } => {
                        let saved = content.contains(SAVED_MARKER);
                        events.push(DrafterEvent::ToolResult(content));
                        if saved {
                            events.push(DrafterEvent::Saved);
                            self.finished = true;
                            return Ok(events);
                        }
                    }
                    _ => {}
                }
            }
        }

        Ok(events)
    }
}
