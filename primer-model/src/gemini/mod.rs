mod client;
mod config;
pub mod convert;

pub use client::GeminiModel;
pub use config::{DEFAULT_GEMINI_MODEL, GEMINI_API_BASE, GeminiConfig};
