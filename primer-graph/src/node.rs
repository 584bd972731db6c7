//! Nodes and what they see while running.

use crate::error::Result;
use crate::state::{MESSAGES, State};
use async_trait::async_trait;
use futures::FutureExt;
use futures::future::BoxFuture;
use primer_core::{Message, messages_from_value, messages_to_value};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// Per-run settings.
#[derive(Clone, Debug)]
pub struct ExecutionConfig {
    /// Tags every log record of the run.
    pub thread_id: String,
    /// Replaces the graph's own recursion limit when set.
    pub recursion_limit: Option<usize>,
}

impl ExecutionConfig {
    pub fn new(thread_id: impl Into<String>) -> Self {
        Self { thread_id: thread_id.into(), recursion_limit: None }
    }

    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = Some(limit);
        self
    }
}

impl Default for ExecutionConfig {
    /// A config with a random thread id.
    fn default() -> Self {
        Self::new(uuid::Uuid::new_v4().to_string())
    }
}

/// Read-only view handed to a node.
///
/// All nodes of one super-step share the same snapshot, so cloning a context
/// does not copy the state.
#[derive(Clone)]
pub struct NodeContext {
    pub state: Arc<State>,
    pub config: ExecutionConfig,
    /// Index of the running super-step, starting at 0.
    pub step: usize,
}

impl NodeContext {
    pub fn new(state: State, config: ExecutionConfig, step: usize) -> Self {
        Self { state: Arc::new(state), config, step }
    }

    pub fn get(&self, channel: &str) -> Option<&Value> {
        self.state.get(channel)
    }

    /// The conversation so far; empty when the channel is unset.
    pub fn messages(&self) -> Result<Vec<Message>> {
        match self.state.get(MESSAGES) {
            Some(value) => Ok(messages_from_value(value)?),
            None => Ok(Vec::new()),
        }
    }
}

/// Channel writes returned by a node. The schema's reducers decide how they land.
#[derive(Debug, Default)]
pub struct NodeOutput {
    pub updates: State,
}

impl NodeOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_update(mut self, channel: &str, value: impl Into<Value>) -> Self {
        self.updates.insert(channel.to_string(), value.into());
        self
    }

    /// Writes `messages` to the [`MESSAGES`] channel.
    pub fn with_messages(self, messages: &[Message]) -> Result<Self> {
        let value = messages_to_value(messages)?;
        Ok(self.with_update(MESSAGES, value))
    }
}

#[async_trait]
pub trait Node: Send + Sync {
    fn name(&self) -> &str;

    async fn execute(&self, ctx: &NodeContext) -> Result<NodeOutput>;
}

type NodeFn = dyn Fn(NodeContext) -> BoxFuture<'static, Result<NodeOutput>> + Send + Sync;

/// A node backed by an async closure.
pub struct FunctionNode {
    name: String,
    run: Box<NodeFn>,
}

impl FunctionNode {
    pub fn new<F, Fut>(name: &str, run: F) -> Self
    where
        F: Fn(NodeContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<NodeOutput>> + Send + 'static,
    {
        Self { name: name.to_string(), run: Box::new(move |ctx| run(ctx).boxed()) }
    }
}

#[async_trait]
impl Node for FunctionNode {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, ctx: &NodeContext) -> Result<NodeOutput> {
        (self.run)(ctx.clone()).await
    }
}
