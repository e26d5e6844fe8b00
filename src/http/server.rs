//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the relay handler and fallbacks
//! - Wire up middleware (tracing, request ID, timeout, ingress filter, body limit)
//! - Bind server to listener
//! - Dispatch captured payloads to the dispatch router
//! - Drain in-flight requests on shutdown, up to a deadline

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    extract::{rejection::BytesRejection, ConnectInfo, State},
    http::{Method, StatusCode, Uri},
    middleware,
    routing::post,
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::Instrument;

use crate::config::{LimitsConfig, RelayConfig};
use crate::http::request::{request_span, RequestIdLayer};
use crate::http::response::RelayError;
use crate::observability::metrics;
use crate::routing::{Delivered, DispatchRouter, IncomingPayload};
use crate::security::{ingress_filter, limits, AllowList};
use crate::upstream::{Downstream, HttpForwarder, Targets};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<DispatchRouter<HttpForwarder>>,
    pub limits: LimitsConfig,
}

/// Failure while assembling the server from configuration.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid target URL: {0}")]
    Target(#[from] url::ParseError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// HTTP server for the webhook relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> Result<Self, ServerError> {
        let targets = Targets::from_config(&config.targets)?;
        let forwarder = HttpForwarder::new(targets, &config.timeouts)?;
        let allow_list = AllowList::new(config.access.allowed_ips.iter().cloned());

        tracing::debug!(
            allowed = allow_list.len(),
            trade = %config.targets.trade,
            exit = %config.targets.exit,
            reverse_exit = %config.targets.reverse_exit,
            reverse_entry = %config.targets.reverse_entry,
            "Relay targets resolved"
        );

        let state = AppState {
            router: Arc::new(DispatchRouter::new(forwarder)),
            limits: config.limits.clone(),
        };

        let router = Self::build_router(&config, state, allow_list);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers run outermost-last: request ID → trace → timeout → ingress
    /// filter → body limit → handler. The trace span carries the request ID,
    /// so every log line of a request is tagged with it.
    #[allow(deprecated)]
    fn build_router(config: &RelayConfig, state: AppState, allow_list: AllowList) -> Router {
        Router::new()
            .route("/", post(relay_handler).fallback(method_not_allowed))
            .fallback(not_found)
            .with_state(state)
            .layer(limits::body_limit(&config.limits))
            .layer(middleware::from_fn_with_state(allow_list, ingress_filter))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(TraceLayer::new_for_http().make_span_with(request_span::<Body>))
            .layer(RequestIdLayer)
    }

    /// Run the server until `shutdown` fires, then drain for at most
    /// `timeouts.shutdown_grace_secs`.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Started");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        let mut drain_started = shutdown.resubscribe();
        let grace = Duration::from_secs(self.config.timeouts.shutdown_grace_secs);

        let serve = axum::serve(listener, app).with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
        });
        let deadline = async move {
            let _ = drain_started.recv().await;
            tokio::time::sleep(grace).await;
        };

        tokio::select! {
            result = serve.into_future() => result?,
            _ = deadline => {
                tracing::warn!(
                    grace_secs = grace.as_secs(),
                    "Drain deadline reached, abandoning in-flight requests"
                );
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

/// `POST /`: capture the body and hand it to the dispatch router.
async fn relay_handler(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    body: Result<Bytes, BytesRejection>,
) -> Result<StatusCode, RelayError> {
    let text = limits::body_text(body, &state.limits)?;
    let payload = IncomingPayload::capture(peer.ip(), text);

    let delivered = dispatch_detached(state.router.clone(), payload).await?;

    tracing::debug!(delivered = ?delivered, "Relayed");
    metrics::record_request(StatusCode::OK.as_u16());
    Ok(StatusCode::OK)
}

/// Run the dispatch on its own task, in the caller's span, so a reverse
/// flow still completes if the caller hangs up. A panic in the task is
/// reported as an internal error.
async fn dispatch_detached<D: Downstream>(
    router: Arc<DispatchRouter<D>>,
    payload: IncomingPayload,
) -> Result<Delivered, RelayError> {
    let span = tracing::Span::current();

    tokio::spawn(async move { router.dispatch(&payload).await }.instrument(span))
        .await
        .map_err(|e| RelayError::Internal(format!("dispatch task failed: {}", e)))?
}

async fn method_not_allowed(method: Method) -> RelayError {
    RelayError::MethodNotAllowed(method)
}

async fn not_found(uri: Uri) -> RelayError {
    RelayError::NotFound(uri.path().to_string())
}
