//! Tracing subscriber initialization for native hosts.
//!
//! In the browser the embedding page installs its own subscriber; this module
//! is not compiled for wasm32.

use thiserror::Error;

/// Error type for logging initialization failures.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Tracing subscriber already initialized
    #[error("Tracing subscriber already initialized")]
    SubscriberAlreadySet,
}

/// Install a stderr subscriber.
///
/// Respects `RUST_LOG`, falling back to `default_filter` (e.g. `"info"` or
/// `"gridview=debug"`).
///
/// # Errors
/// Returns [`LoggingError::SubscriberAlreadySet`] if a global subscriber exists.
pub fn init(default_filter: &str) -> Result<(), LoggingError> {
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|_| LoggingError::SubscriberAlreadySet)
}
