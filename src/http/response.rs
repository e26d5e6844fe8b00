//! Response handling and error mapping.
//!
//! # Responsibilities
//! - Define every way a request can fail
//! - Map each failure to exactly one HTTP status code
//! - Log the failure once, at the point it becomes a response
//!
//! # Design Decisions
//! - Callers only ever see a bare status code, never an error body
//! - Anything without a more specific status is a 500

use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::observability::metrics;
use crate::upstream::{ForwardError, ForwardingTarget};

/// Terminal outcome of a failed request.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("source {0} is not allow-listed")]
    Forbidden(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("payload exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("method {0} not allowed")]
    MethodNotAllowed(Method),

    #[error("no route for {0}")]
    NotFound(String),

    #[error("forwarding to {target} failed: {source}")]
    Forward {
        target: ForwardingTarget,
        #[source]
        source: ForwardError,
    },

    #[error("internal error: {0}")]
    Internal(String),
}

impl RelayError {
    /// The one place failures become status codes.
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::Forbidden(_) => StatusCode::FORBIDDEN,
            RelayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            RelayError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            RelayError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::NotFound(_) => StatusCode::NOT_FOUND,
            RelayError::Forward { .. } | RelayError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Request rejected");
        }
        metrics::record_request(status.as_u16());

        status.into_response()
    }
}
