//! # primer-core
//!
//! Core message, model, and tool abstractions shared by the agent-primer crates.
//!
//! ## Overview
//!
//! - [`Message`] / [`ToolCall`] - The chat message model threaded through graph state
//! - [`Llm`] - The chat-completion interface implemented by model clients
//! - [`Tool`] / [`ToolContext`] - Callable capabilities offered to the model
//! - [`PrimerError`] / [`Result`] - Unified error handling
//!
//! ## Quick Start
//!
//! ```rust
//! use primer_core::{Message, ToolCall};
//! use serde_json::json;
//!
//! let history = vec![
//!     Message::system("You are my AI assistant."),
//!     Message::human("234 + 5678"),
//!     Message::ai_with_tool_calls(
//!         "",
//!         vec![ToolCall::new("call_1", "add", json!({"a": 234, "b": 5678}))],
//!     ),
//!     Message::tool("call_1", "add", "5912"),
//! ];
//! assert!(history[2].has_tool_calls());
//! ```

pub mod error;
pub mod model;
pub mod tool;
pub mod types;

pub use error::{PrimerError, Result};
pub use model::{
    FinishReason, GenerateContentConfig, Llm, LlmRequest, LlmResponse, LlmResponseStream,
    UsageMetadata, generate,
};
pub use tool::{CallContext, Tool, ToolContext};
pub use types::{Message, ToolCall, messages_from_value, messages_to_value};
