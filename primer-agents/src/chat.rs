//! Memory chat: the caller keeps the whole conversation and replays it every turn.

use std::path::Path;
use std::sync::Arc;

use primer_core::{Llm, Message};
use primer_graph::{
    CompiledGraph, END, ExecutionConfig, MESSAGES, NodeOutput, START, StateGraph, messages_input,
};
use primer_model::BoundModel;
use tracing::{debug, info};

use crate::error::Result;

pub const EXIT_WORD: &str = "exit";

/// Whether `input` ends the chat loop.
pub fn is_exit(input: &str) -> bool {
    input.eq_ignore_ascii_case(EXIT_WORD)
}

/// START -> `process` -> END over an overwrite `messages` channel.
///
/// `process` sends the full history to the model and returns it with the
/// reply appended. Tool calls on the reply are dropped; only its text is kept.
pub fn build_graph(llm: Arc<dyn Llm>) -> Result<CompiledGraph> {
    let model = BoundModel::new(llm);
    let graph = StateGraph::with_channels(&[MESSAGES])
        .add_node_fn("process", move |ctx| {
            let model = model.clone();
            async move {
                let mut messages = ctx.messages()?;
                let response = model.invoke(messages.clone()).await?;
                info!(reply = %response.content(), "AI");
                messages.push(Message::ai(response.content()));
                debug!(messages = ?messages, "current state messages");
                NodeOutput::new().with_messages(&messages)
            }
        })
        .add_edge(START, "process")
        .add_edge("process", END)
        .compile()?;
    Ok(graph)
}

/// A conversation whose history lives in memory between turns.
pub struct ChatSession {
    graph: CompiledGraph,
    history: Vec<Message>,
}

impl ChatSession {
    pub fn new(llm: Arc<dyn Llm>) -> Result<Self> {
        Ok(Self { graph: build_graph(llm)?, history: Vec::new() })
    }

    /// Send one human turn and return the model's reply.
    ///
    /// History only changes when the turn succeeds.
    pub async fn send(&mut self, text: &str) -> Result<String> {
        let mut turn = self.history.clone();
        turn.push(Message::human(text));
        let result = self.graph.invoke(messages_input(&turn)?, ExecutionConfig::default()).await?;
        self.history = match result.get(MESSAGES) {
            Some(value) => primer_core::messages_from_value(value)?,
            None => turn,
        };
        Ok(self.history.last().map(|m| m.content().to_string()).unwrap_or_default())
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn into_history(self) -> Vec<Message> {
        self.history
    }
}

/// Plain-text dump of a finished conversation.
pub struct Transcript;

impl Transcript {
    /// Human and AI turns only; system and tool messages are skipped.
    pub fn render(history: &[Message]) -> String {
        let mut out = String::from("Your conversation history:\n");
        for message in history {
            match message {
                Message::Human { content } => out.push_str(&format!("Human: {content}\n")),
                Message::Ai { content, .. } => out.push_str(&format!("AI: {content}\n\n")),
                _ => {}
            }
        }
        out.push_str("\nEnd of conversation.\n");
        out
    }

    /// Overwrite `path` with the rendered transcript.
    pub async fn write(path: impl AsRef<Path>, history: &[Message]) -> Result<()> {
        let path = path.as_ref();
        tokio::fs::write(path, Self::render(history)).await?;
        info!(path = %path.display(), turns = history.len(), "conversation history logged");
        Ok(())
    }
}
