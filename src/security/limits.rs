//! Request body limits.
//!
//! # Responsibilities
//! - Cap the buffered body size (`limits.max_body_bytes`)
//! - Turn the captured bytes into the text the dispatch router sees
//!
//! # Design Decisions
//! - Any content type is accepted, including none
//! - Oversized bodies are rejected with 413 before classification
//! - Bodies must be UTF-8; nothing is decoded lossily

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;

use crate::config::LimitsConfig;
use crate::http::response::RelayError;

/// Layer that applies the configured body limit to every route.
pub fn body_limit(config: &LimitsConfig) -> DefaultBodyLimit {
    DefaultBodyLimit::max(config.max_body_bytes)
}

/// Convert a captured body (or its rejection) into request text.
pub fn body_text(
    body: Result<Bytes, BytesRejection>,
    config: &LimitsConfig,
) -> Result<String, RelayError> {
    let bytes = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            RelayError::PayloadTooLarge {
                limit: config.max_body_bytes,
            }
        } else {
            RelayError::BadRequest(rejection.body_text())
        }
    })?;

    String::from_utf8(bytes.to_vec())
        .map_err(|e| RelayError::BadRequest(format!("body is not UTF-8: {}", e)))
}
