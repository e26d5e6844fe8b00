//! Startup: configuration, then logging.
//!
//! A config file that cannot be used still has to be reported through the
//! log sink the operator asked for, so logging comes up with fallback
//! settings before startup aborts.

use std::path::Path;

use thiserror::Error;

use crate::config::{load_config, ConfigError, ObservabilityConfig, RelayConfig};
use crate::observability::logging::{self, LoggingError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Logging(#[from] LoggingError),
}

/// Load the config (built-in defaults when `path` is `None`) and install
/// the global subscriber. On a config failure the subscriber is built from
/// `fallback` and the failure is logged before it is returned.
pub fn bootstrap(
    path: Option<&Path>,
    production: bool,
    fallback: &ObservabilityConfig,
) -> Result<RelayConfig, StartupError> {
    let loaded = match path {
        Some(path) => load_config(path),
        None => Ok(RelayConfig::default()),
    };

    match loaded {
        Ok(config) => {
            logging::init_logging(&config.observability, production)?;
            Ok(config)
        }
        Err(e) => {
            logging::init_logging(fallback, production)?;
            tracing::error!(error = %e, path = ?path, "Stopped by error");
            Err(e.into())
        }
    }
}
