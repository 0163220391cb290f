//! # Structured Logging
//!
//! Installs a `tracing` subscriber with an `EnvFilter` and either a
//! human-readable or a JSON formatter. Library code only emits events; call
//! [`init_logging`] once from the host binary (or not at all if the host
//! installs its own subscriber).
//!
//! Events carry keys and counts as fields. Secret values are never logged.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::ObservabilityConfig;
use crate::secrets::{Result, SecretsError};

/// Build the filter for a config. `RUST_LOG` takes precedence when set.
pub fn build_filter(config: &ObservabilityConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(&config.log_level).map_err(|e| {
        SecretsError::config_error(format!("Invalid log level '{}': {}", config.log_level, e))
    })
}

/// Install the global subscriber.
///
/// Returns `Ok(false)` if a subscriber was already installed elsewhere
/// (e.g. by a test harness); that is not treated as an error.
pub fn init_logging(config: &ObservabilityConfig) -> Result<bool> {
    let filter = build_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json_logging {
        registry.with(tracing_subscriber::fmt::layer().json().with_target(true)).try_init().is_ok()
    } else {
        registry.with(tracing_subscriber::fmt::layer().with_target(true)).try_init().is_ok()
    };

    if installed {
        tracing::info!(
            log_level = %config.log_level,
            json_logging = config.json_logging,
            "Logging initialized"
        );
    }
    Ok(installed)
}
