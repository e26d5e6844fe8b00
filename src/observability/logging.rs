//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once at startup
//! - Console output in development, append-only file in production
//! - Route panics through the same log stream
//!
//! # Design Decisions
//! - `RUST_LOG` overrides the configured level
//! - File output carries no ANSI colour codes

use std::fs::OpenOptions;
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogOutput, ObservabilityConfig};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("cannot open log file: {0}")]
    File(#[from] std::io::Error),

    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("logging already initialized: {0}")]
    Init(#[from] TryInitError),
}

/// Resolve the effective output; production mode always logs to file.
pub fn effective_output(config: &ObservabilityConfig, production: bool) -> LogOutput {
    if production {
        LogOutput::File
    } else {
        config.log_output
    }
}

/// Install the global subscriber.
pub fn init_logging(config: &ObservabilityConfig, production: bool) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(format!(
            "webhook_relay={level},tower_http={level}",
            level = config.log_level
        ))?,
    };

    let (console, file) = match effective_output(config, production) {
        LogOutput::Console => (Some(fmt::layer()), None),
        LogOutput::File => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&config.log_file)?;
            (
                None,
                Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file))),
            )
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()?;

    Ok(())
}

/// Log panics before the default hook reports them.
pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!(panic = %info, "Unhandled panic");
        default_hook(info);
    }));
}
