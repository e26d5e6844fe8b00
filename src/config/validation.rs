//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Target URLs must be absolute http(s) URLs
//! - Validate value ranges (timeouts > 0, limits > 0)
//! - The request timeout must outlast a complete reverse flow
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::RelayConfig;
use crate::routing::REVERSE_PHASE_DELAY;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address `{0}`")]
    BindAddress(String),

    #[error("target `{name}` has invalid URL `{url}`: {reason}")]
    TargetUrl {
        name: &'static str,
        url: String,
        reason: String,
    },

    #[error("allow-list is empty; every request would be rejected")]
    EmptyAllowList,

    #[error("`{0}` must be greater than zero")]
    Zero(&'static str),

    #[error("request timeout {request_secs}s cannot cover a reverse flow (needs more than {required_secs}s)")]
    RequestTimeoutTooShort { request_secs: u64, required_secs: u64 },

    #[error("invalid metrics address `{0}`")]
    MetricsAddress(String),
}

/// Validate a parsed configuration, collecting every error.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    let targets = &config.targets;
    for (name, url) in [
        ("trade", &targets.trade),
        ("exit", &targets.exit),
        ("reverse_exit", &targets.reverse_exit),
        ("reverse_entry", &targets.reverse_entry),
    ] {
        if let Err(reason) = check_target_url(url) {
            errors.push(ValidationError::TargetUrl {
                name,
                url: url.clone(),
                reason,
            });
        }
    }

    if config.access.allowed_ips.is_empty() {
        errors.push(ValidationError::EmptyAllowList);
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::Zero("limits.max_body_bytes"));
    }

    let timeouts = &config.timeouts;
    for (name, value) in [
        ("timeouts.connect_secs", timeouts.connect_secs),
        ("timeouts.forward_secs", timeouts.forward_secs),
        ("timeouts.request_secs", timeouts.request_secs),
        ("timeouts.shutdown_grace_secs", timeouts.shutdown_grace_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::Zero(name));
        }
    }

    let required_secs = REVERSE_PHASE_DELAY
        .as_secs()
        .saturating_add(timeouts.forward_secs.saturating_mul(2));
    if timeouts.request_secs <= required_secs {
        errors.push(ValidationError::RequestTimeoutTooShort {
            request_secs: timeouts.request_secs,
            required_secs,
        });
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_target_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("unsupported scheme `{}`", other)),
    }
}
