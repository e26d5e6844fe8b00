//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the webhook relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Source addresses permitted to submit webhooks.
    pub access: AccessConfig,

    /// Downstream endpoints, one per forwarding target.
    pub targets: TargetsConfig,

    /// Request limits.
    pub limits: LimitsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:80").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            // Signal providers only deliver to port 80.
            bind_address: "0.0.0.0:80".to_string(),
        }
    }
}

/// Ingress allow-list.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AccessConfig {
    /// Exact address strings, compared against the peer IP as rendered.
    pub allowed_ips: Vec<String>,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            allowed_ips: vec![
                "localhost".to_string(),
                "::1".to_string(),
                "127.0.0.1".to_string(),
                "::ffff:52.89.214.238".to_string(),
                "::ffff:34.212.75.30".to_string(),
                "::ffff:54.218.53.128".to_string(),
                "::ffff:52.32.178.7".to_string(),
            ],
        }
    }
}

/// Downstream target URLs.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TargetsConfig {
    /// Receives `trade:` payloads verbatim as text/plain.
    pub trade: String,

    /// Receives `type: "exit"` payloads verbatim as JSON.
    pub exit: String,

    /// Reverse flow, phase 1: the market exit order.
    pub reverse_exit: String,

    /// Reverse flow, phase 2: the new entry order.
    pub reverse_entry: String,
}

impl Default for TargetsConfig {
    fn default() -> Self {
        let signals = "https://zignaly.com/api/signals.php".to_string();
        Self {
            trade: "http://localhost:81/frostybot".to_string(),
            exit: signals.clone(),
            reverse_exit: signals.clone(),
            reverse_entry: signals,
        }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum accepted body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 100 * 1024,
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Outbound connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Total time allowed for one outbound call in seconds.
    pub forward_secs: u64,

    /// Server-side limit for a whole inbound request in seconds.
    /// Must outlast a full reverse flow.
    pub request_secs: u64,

    /// How long in-flight requests may drain after a shutdown signal.
    pub shutdown_grace_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            forward_secs: 30,
            request_secs: 300,
            shutdown_grace_secs: 5,
        }
    }
}

/// Where log lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Console,
    File,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Console for development, file for production.
    pub log_output: LogOutput,

    /// Log file path, used when `log_output` is `file`.
    pub log_file: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_output: LogOutput::Console,
            log_file: "logs.txt".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
