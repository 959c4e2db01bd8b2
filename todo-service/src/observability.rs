//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

use crate::{
    config::Config,
    error::{Error, Result},
};

/// Install the global tracing subscriber
///
/// Production emits JSON lines; every other environment gets the
/// human-readable formatter. An unparsable `log_level` falls back to `info`.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_new(&config.service.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = if config.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init()
    };
    installed.map_err(|e| Error::Internal(format!("Failed to install tracing subscriber: {e}")))?;

    tracing::info!(
        environment = %config.service.environment,
        "Tracing initialized for service: {}",
        config.service.name
    );

    Ok(())
}
