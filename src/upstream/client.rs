//! Outbound HTTP calls to forwarding targets.
//!
//! # Responsibilities
//! - POST one body to one target, with the body's content type
//! - Treat any non-2xx status, network error or timeout as failure
//! - Record per-target call metrics
//!
//! # Design Decisions
//! - Exactly one attempt per call; the caller decides what failure means
//! - Connect and total timeouts are always set so no call hangs forever

use std::future::Future;
use std::time::{Duration, Instant};

use reqwest::header::CONTENT_TYPE;
use thiserror::Error;

use crate::config::TimeoutConfig;
use crate::observability::metrics;
use crate::upstream::target::{ForwardingTarget, Targets};

/// A request body bound for a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Sent as `text/plain`.
    Text(String),
    /// Already-encoded JSON, sent as `application/json`.
    Json(String),
}

impl Outbound {
    pub fn content_type(&self) -> &'static str {
        match self {
            Outbound::Text(_) => "text/plain",
            Outbound::Json(_) => "application/json",
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Outbound::Text(body) | Outbound::Json(body) => body,
        }
    }

    pub fn into_string(self) -> String {
        match self {
            Outbound::Text(body) | Outbound::Json(body) => body,
        }
    }
}

/// Why a single outbound call failed.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("target answered {status}")]
    Rejected { status: u16 },
}

/// The seam between the dispatch router and the network.
pub trait Downstream: Send + Sync + 'static {
    /// Deliver `body` to `target`. One attempt, no retry.
    fn deliver(
        &self,
        target: ForwardingTarget,
        body: Outbound,
    ) -> impl Future<Output = Result<(), ForwardError>> + Send;
}

/// Production downstream backed by a pooled reqwest client.
#[derive(Debug, Clone)]
pub struct HttpForwarder {
    client: reqwest::Client,
    targets: Targets,
}

impl HttpForwarder {
    pub fn new(targets: Targets, timeouts: &TimeoutConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.forward_secs))
            .build()?;

        Ok(Self { client, targets })
    }

    pub fn targets(&self) -> &Targets {
        &self.targets
    }
}

impl Downstream for HttpForwarder {
    async fn deliver(&self, target: ForwardingTarget, body: Outbound) -> Result<(), ForwardError> {
        let url = self.targets.url(target).clone();
        let start_time = Instant::now();

        tracing::debug!(destination = %target, url = %url, bytes = body.as_str().len(), "Forwarding");

        let result: Result<(), ForwardError> = async {
            let response = self
                .client
                .post(url)
                .header(CONTENT_TYPE, body.content_type())
                .body(body.into_string())
                .send()
                .await?;

            let status = response.status();
            if status.is_success() {
                Ok(())
            } else {
                Err(ForwardError::Rejected {
                    status: status.as_u16(),
                })
            }
        }
        .await;

        metrics::record_forward(target, result.is_ok(), start_time);
        result
    }
}
