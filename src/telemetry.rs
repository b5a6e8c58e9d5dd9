use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ============================================================================
// Telemetry Bootstrap
// ============================================================================

/// Initialize structured logging with environment-based filtering.
/// Default to INFO level, can be overridden with RUST_LOG env var.
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init() {
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,paygate_core=debug")),
        )
        .try_init();
}
