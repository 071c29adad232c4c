// Logging/tracing setup for the CLI

/// Initialize tracing, preferring an explicit level over RUST_LOG.
///
/// Safe to call more than once; only the first subscriber wins.
pub fn init_tracing(log_level: Option<&str>) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter = match log_level {
        Some(level) => EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info")),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let registry = tracing_subscriber::registry().with(env_filter);

    // Try to set the global subscriber; ignore error if already set (idempotent)
    let _ = tracing::subscriber::set_global_default(registry.with(fmt::layer()));
}
