//! # primer-cli
//!
//! The `primer` binary: one subcommand per tutorial.
//!
//! ```bash
//! primer chat --log-file logging.txt
//! primer react --query "234 + 5678 then multiply the result by 3, finally subtract 1000"
//! primer drafter --output-dir drafts
//! primer rag --pdf materials/Stock_Market_Performance_2024.pdf
//! ```
//!
//! The API key is read from `GOOGLE_API_KEY` or `GEMINI_API_KEY`; a `.env`
//! file in the working directory is loaded first.

pub mod cli;
pub mod config;
pub mod console;

pub use cli::{Cli, Commands};
pub use config::Config;
