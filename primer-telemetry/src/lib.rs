//! # primer-telemetry
//!
//! Structured logging for the agent-primer tutorials using `tracing`.
//!
//! ## Usage
//!
//! ```rust
//! use primer_telemetry::{init_telemetry, info};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_telemetry("my-tutorial")?;
//!     info!("tutorial started");
//!     Ok(())
//! }
//! ```

pub mod init;

// Re-export tracing macros for convenience
pub use tracing::{Span, debug, error, info, instrument, trace, warn};

pub use init::{DEFAULT_FILTER, init_telemetry, init_with_filter};
