//! # primer-model
//!
//! Chat model clients for agent-primer.
//!
//! ## Overview
//!
//! - [`GeminiModel`] - Google's Gemini models over the `generateContent` REST API
//! - [`BoundModel`] - A model with tools and a system prompt attached
//! - [`MockLlm`] - Scripted model for tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use primer_model::{GeminiConfig, GeminiModel};
//!
//! let api_key = std::env::var("GOOGLE_API_KEY").unwrap();
//! let model = GeminiModel::new(GeminiConfig::new(api_key, "gemini-2.5-flash")).unwrap();
//! ```
//!
//! ## Features
//!
//! - Tool/function calling with synthesized call ids
//! - Schema sanitizing for Gemini's OpenAPI subset
//! - Retry with exponential backoff on transient HTTP failures

pub mod bound;
pub mod gemini;
pub mod mock;
pub mod retry;

pub use bound::BoundModel;
pub use gemini::{DEFAULT_GEMINI_MODEL, GEMINI_API_BASE, GeminiConfig, GeminiModel};
pub use mock::MockLlm;
pub use retry::RetryConfig;
