//! Webhook relay.
//!
//! Receives trading-signal webhooks and forwards them to fixed downstream
//! services.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────────┐
//!                        │                  WEBHOOK RELAY                   │
//!   Signal provider      │  ┌──────────┐   ┌──────────┐   ┌─────────────┐   │
//!   ─────────────────────┼─▶│ ingress  │──▶│  body    │──▶│  dispatch   │   │
//!        POST /          │  │ filter   │   │  limit   │   │  router     │   │
//!                        │  └──────────┘   └──────────┘   └──────┬──────┘   │
//!                        │                                       │          │
//!                        │        trade ─── text/plain ──────────┤          │
//!                        │        exit ──── raw JSON ────────────┤          │
//!                        │        reverse ─ exit leg, 120 s, ────┤          │
//!                        │                  entry leg            ▼          │
//!   ◀────────────────────┼── status code ◀─────────────── upstream client ──┼──▶ targets
//!                        └──────────────────────────────────────────────────┘
//! ```

use std::error::Error;
use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use webhook_relay::config::{ObservabilityConfig, RelayConfig};
use webhook_relay::lifecycle::{bootstrap, wait_for_termination, Shutdown};
use webhook_relay::observability::{logging, metrics};
use webhook_relay::HttpServer;

#[derive(Parser)]
#[command(name = "webhook-relay")]
#[command(about = "Relay trading-signal webhooks to downstream services", long_about = None)]
struct Cli {
    /// TOML configuration file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Production mode: write logs to the configured log file.
    #[arg(long)]
    production: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let config = bootstrap(
        cli.config.as_deref(),
        cli.production,
        &ObservabilityConfig::default(),
    )?;
    logging::install_panic_hook();

    tracing::info!("webhook-relay v{} starting", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Stopped by error");
        return Err(e);
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn run(config: RelayConfig) -> Result<(), Box<dyn Error>> {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        allowed_ips = config.access.allowed_ips.len(),
        max_body_bytes = config.limits.max_body_bytes,
        forward_timeout_secs = config.timeouts.forward_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config)?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        match wait_for_termination().await {
            Ok(signal) => {
                tracing::info!("Stopped by signal: {}", signal);
                shutdown.trigger();
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handlers");
                // Keep the coordinator alive so the server is not stopped.
                std::future::pending::<()>().await;
            }
        }
    });

    server.run(listener, server_shutdown).await?;
    Ok(())
}
