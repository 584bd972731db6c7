//! Telemetry initialization and configuration

use std::sync::Once;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Filter used when `RUST_LOG` is unset. The tutorials are interactive, so
/// only warnings reach the console by default.
pub const DEFAULT_FILTER: &str = "warn";

/// Initialize console logging to stderr.
///
/// The filter is read from `RUST_LOG`, falling back to [`DEFAULT_FILTER`].
/// Calling this more than once is a no-op.
///
/// # Example
/// ```
/// use primer_telemetry::init_telemetry;
/// init_telemetry("react-tutorial").expect("Failed to initialize telemetry");
/// ```
pub fn init_telemetry(service_name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))?;
    init_with_filter(service_name, filter);
    Ok(())
}

/// Initialize console logging with an explicit filter.
pub fn init_with_filter(service_name: &str, filter: EnvFilter) {
    INIT.call_once(|| {
        let result = tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_line_number(true),
            )
            .try_init();

        match result {
            Ok(()) => tracing::debug!(service.name = service_name, "Telemetry initialized"),
            // Another subscriber (e.g. a test harness) is already installed.
            Err(e) => eprintln!("telemetry for {service_name} not installed: {e}"),
        }
    });
}
