//! Tracing subscriber setup for binaries embedding MinLog.

use tracing_subscriber::EnvFilter;

use crate::config::MinLogConfig;
use crate::error::{ConfigError, Result};

/// Parse the configured `EnvFilter` directive.
pub fn build_filter(config: &MinLogConfig) -> Result<EnvFilter> {
    EnvFilter::try_new(&config.log_filter)
        .map_err(|_| ConfigError::invalid_value("log_filter", config.log_filter.clone()))
}

/// Install a global fmt subscriber writing to stderr, plain or JSON per
/// `config.json`.
///
/// A subscriber that is already installed is left in place.
pub fn init_tracing(config: &MinLogConfig) -> Result<()> {
    let filter = build_filter(config)?;

    let installed = if config.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init()
    };

    if let Err(e) = installed {
        tracing::debug!(error = %e, "Tracing subscriber already installed");
    }
    Ok(())
}
