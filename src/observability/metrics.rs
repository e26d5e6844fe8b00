//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): inbound requests by status
//! - `relay_forward_total` (counter): outbound calls by destination, outcome
//! - `relay_forward_duration_seconds` (histogram): outbound call latency
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::upstream::ForwardingTarget;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(status: u16) {
    counter!("relay_requests_total", "status" => status.to_string()).increment(1);
}

pub fn record_forward(target: ForwardingTarget, success: bool, start_time: Instant) {
    let outcome = if success { "success" } else { "failure" };
    counter!(
        "relay_forward_total",
        "destination" => target.as_str(),
        "outcome" => outcome
    )
    .increment(1);
    histogram!("relay_forward_duration_seconds", "destination" => target.as_str())
        .record(start_time.elapsed().as_secs_f64());
}
