//! # primer-tool
//!
//! Tools the model can call.
//!
//! - [`FunctionTool`] - Create tools from async Rust functions
//! - [`BasicToolset`] - Group tools and look them up by name
//!
//! ## Quick Start
//!
//! ```rust
//! use primer_tool::{FunctionTool, required_i64};
//! use schemars::JsonSchema;
//! use serde::Deserialize;
//! use serde_json::json;
//!
//! #[derive(Deserialize, JsonSchema)]
//! struct AddArgs {
//!     a: i64,
//!     b: i64,
//! }
//!
//! let tool = FunctionTool::new(
//!     "add",
//!     "This is an addition function that adds 2 numbers together",
//!     |_ctx, args| async move {
//!         Ok(json!(required_i64(&args, "a")? + required_i64(&args, "b")?))
//!     },
//! )
//! .with_parameters_schema::<AddArgs>();
//! ```

mod function_tool;
pub mod toolset;

pub use function_tool::{FunctionTool, required_i64, required_str};
pub use primer_core::{Tool, ToolContext};
pub use toolset::BasicToolset;
