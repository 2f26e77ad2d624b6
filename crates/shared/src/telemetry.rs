//! Tracing subscriber setup for applications embedding Tally.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::error::{AppError, AppResult};

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured filter when it is set.
///
/// # Errors
///
/// Returns `AppError::Configuration` for an invalid filter directive and
/// `AppError::Internal` if a global subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> AppResult<()> {
    let filter = build_filter(config)?;

    let json = config.json.then(|| tracing_subscriber::fmt::layer().json());
    let pretty = (!config.json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(pretty)
        .try_init()
        .map_err(|e| AppError::Internal(format!("tracing already initialised: {e}")))?;

    tracing::debug!(filter = %config.filter, json = config.json, "tracing initialised");
    Ok(())
}

fn build_filter(config: &LoggingConfig) -> AppResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(&config.filter).map_err(|e| {
        AppError::Configuration(format!("invalid log filter '{}': {e}", config.filter))
    })
}
