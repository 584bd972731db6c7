//! # primer-graph
//!
//! A small state-graph runtime for tool-calling agents, in the style of LangGraph.
//!
//! A graph is a set of [`Node`]s over a shared [`State`]. Each channel of the
//! state has a [`Reducer`] that decides how node writes are merged. Execution
//! proceeds in super-steps: the pending nodes run concurrently on one
//! snapshot, their writes are merged, and the edges of the nodes that ran pick
//! the next pending set. A run ends when every path reaches [`END`] or fails
//! once it exceeds its recursion limit.
//!
//! The ReAct loop used by the agents looks like this:
//!
//! ```rust,ignore
//! use primer_graph::{
//!     END, ExecutionConfig, START, StateGraph, StateSchema, ToolNode, messages_input,
//!     tools_condition,
//! };
//!
//! let graph = StateGraph::new(StateSchema::messages())
//!     .add_node_fn("agent", call_model)
//!     .add_node(ToolNode::new("tools", tools))
//!     .add_edge(START, "agent")
//!     .add_conditional_edges("agent", tools_condition, [("tools", "tools"), (END, END)])
//!     .add_edge("tools", "agent")
//!     .compile()?;
//!
//! let input = messages_input(&[Message::human("2 + 2")])?;
//! let state = graph.invoke(input, ExecutionConfig::default()).await?;
//! ```

mod edge;
mod error;
mod executor;
mod graph;
mod node;
mod prebuilt;
pub mod state;
mod stream;

pub use edge::{END, START};
pub use error::{GraphError, Result};
pub use graph::{CompiledGraph, DEFAULT_RECURSION_LIMIT, StateGraph};
pub use node::{ExecutionConfig, FunctionNode, Node, NodeContext, NodeOutput};
pub use prebuilt::{
    TOOLS, ToolNode, last_message, messages_input, tool_output_text, tools_condition,
};
pub use state::{Channel, MESSAGES, MergeFn, Reducer, State, StateSchema, StateSchemaBuilder};
pub use stream::{StreamEvent, StreamMode};
