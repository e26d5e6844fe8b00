//! Dispatch router: classify a payload and run its forwarding protocol.

use std::time::Duration;

use serde_json::{Map, Value};

use crate::http::response::RelayError;
use crate::routing::intent::{classify, ClassifiedIntent, IncomingPayload, InvalidReason};
use crate::routing::transform::ReverseTransform;
use crate::upstream::{Downstream, ForwardingTarget, Outbound};

/// Fixed pause between the two legs of a reverse flow.
pub const REVERSE_PHASE_DELAY: Duration = Duration::from_secs(120);

/// A successfully relayed payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivered {
    Trade,
    Exit,
    Reverse,
}

/// Stateless across requests; safe to share behind an `Arc`.
pub struct DispatchRouter<D> {
    downstream: D,
}

impl<D: Downstream> DispatchRouter<D> {
    pub fn new(downstream: D) -> Self {
        Self { downstream }
    }

    pub fn downstream(&self) -> &D {
        &self.downstream
    }

    /// Relay one payload. Every outbound call is attempted exactly once.
    pub async fn dispatch(&self, payload: &IncomingPayload) -> Result<Delivered, RelayError> {
        if payload.body.trim().is_empty() {
            return Err(RelayError::BadRequest(InvalidReason::Empty.to_string()));
        }

        tracing::info!(
            source = %payload.source,
            received_at = %payload.received_at.to_rfc3339(),
            content = %payload.body,
            "Received webhook"
        );

        match classify(&payload.body) {
            ClassifiedIntent::Trade(text) => {
                self.forward(ForwardingTarget::Trade, Outbound::Text(text)).await?;
                Ok(Delivered::Trade)
            }
            ClassifiedIntent::Exit(raw) => {
                self.forward(ForwardingTarget::Exit, Outbound::Json(raw)).await?;
                Ok(Delivered::Exit)
            }
            ClassifiedIntent::Reverse(signal) => {
                self.reverse(&signal).await?;
                Ok(Delivered::Reverse)
            }
            ClassifiedIntent::Invalid(reason) => Err(RelayError::BadRequest(reason.to_string())),
        }
    }

    /// Exit leg, fixed pause, entry leg. A failed exit leg ends the flow.
    async fn reverse(&self, signal: &Map<String, Value>) -> Result<(), RelayError> {
        let legs = ReverseTransform::from_signal(signal);

        let exit = legs.exit.to_outbound().map_err(encode_error)?;
        self.forward(ForwardingTarget::ReverseExit, exit).await?;

        tracing::info!(
            delay_secs = REVERSE_PHASE_DELAY.as_secs(),
            "Reverse exit leg delivered, waiting before entry leg"
        );
        tokio::time::sleep(REVERSE_PHASE_DELAY).await;

        let entry = legs.entry.to_outbound().map_err(encode_error)?;
        self.forward(ForwardingTarget::ReverseEntry, entry).await
    }

    async fn forward(&self, target: ForwardingTarget, body: Outbound) -> Result<(), RelayError> {
        let content = body.as_str().to_owned();

        self.downstream
            .deliver(target, body)
            .await
            .map_err(|source| RelayError::Forward { target, source })?;

        tracing::info!(destination = %target, content = %content, "Sent webhook");
        Ok(())
    }
}

fn encode_error(e: serde_json::Error) -> RelayError {
    RelayError::Internal(format!("failed to encode reverse leg: {}", e))
}
