//! # primer-agents
//!
//! The four tutorial agents, as library code that runs against any [`Llm`](primer_core::Llm).
//!
//! - [`chat`] - Memory chat loop with a transcript dump
//! - [`react`] - ReAct loop over `add` / `subtract` / `multiply`
//! - [`drafter`] - Document drafting with `update` and `save` tools
//! - [`rag`] - Question answering over a PDF through a retrieval tool
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use primer_agents::chat::ChatSession;
//! use primer_model::MockLlm;
//! use primer_core::Message;
//! use std::sync::Arc;
//!
//! # async fn run() -> primer_agents::Result<()> {
//! let llm = Arc::new(MockLlm::new("mock").with_message(Message::ai("Hello Bob!")));
//! let mut session = ChatSession::new(llm)?;
//! let reply = session.send("Hi, I'm Bob").await?;
//! assert_eq!(reply, "Hello Bob!");
//! # Ok(())
//! # }
//! ```

pub mod chat;
pub mod drafter;
pub mod error;
pub mod rag;
pub mod react;

pub use chat::{ChatSession, Transcript};
pub use drafter::{DocumentStore, DrafterEvent, DrafterSession};
pub use error::{AgentError, Result};
pub use rag::{IngestReport, RagAgent, RagAgentConfig};
pub use react::ReactAgent;
