//! Payload classification.
//!
//! # Rules (first match wins)
//! - Text starting with `trade:` → Trade (raw text)
//! - JSON object with `type == "exit"` → Exit (raw text)
//! - JSON object with `type == "reverse"` → Reverse (decoded object)
//! - Anything else → Invalid
//!
//! # Design Decisions
//! - Pure function of the payload text
//! - Only non-prefixed text is ever JSON-decoded
//! - `type` comparison is exact and case-sensitive

use std::fmt;
use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// Literal prefix marking a plain-text trade command.
pub const TRADE_PREFIX: &str = "trade:";

/// A captured inbound webhook.
#[derive(Debug, Clone)]
pub struct IncomingPayload {
    pub source: IpAddr,
    pub received_at: DateTime<Utc>,
    pub body: String,
}

impl IncomingPayload {
    /// Capture a body as received now.
    pub fn capture(source: IpAddr, body: String) -> Self {
        Self {
            source,
            received_at: Utc::now(),
            body,
        }
    }
}

/// What a payload asks the relay to do.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedIntent {
    Trade(String),
    Exit(String),
    Reverse(Map<String, Value>),
    Invalid(InvalidReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    Empty,
    MalformedJson(String),
    NotAnObject,
    MissingType,
    UnknownType(String),
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::Empty => write!(f, "empty body"),
            InvalidReason::MalformedJson(e) => write!(f, "body is not valid JSON: {}", e),
            InvalidReason::NotAnObject => write!(f, "JSON body is not an object"),
            InvalidReason::MissingType => write!(f, "JSON body has no string `type` field"),
            InvalidReason::UnknownType(t) => write!(f, "unrecognized type `{}`", t),
        }
    }
}

impl ClassifiedIntent {
    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            ClassifiedIntent::Trade(_) => "trade",
            ClassifiedIntent::Exit(_) => "exit",
            ClassifiedIntent::Reverse(_) => "reverse",
            ClassifiedIntent::Invalid(_) => "invalid",
        }
    }
}

/// Classify a raw body.
pub fn classify(body: &str) -> ClassifiedIntent {
    if body.trim().is_empty() {
        return ClassifiedIntent::Invalid(InvalidReason::Empty);
    }

    if body.starts_with(TRADE_PREFIX) {
        return ClassifiedIntent::Trade(body.to_string());
    }

    let decoded: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => return ClassifiedIntent::Invalid(InvalidReason::MalformedJson(e.to_string())),
    };

    let Value::Object(object) = decoded else {
        return ClassifiedIntent::Invalid(InvalidReason::NotAnObject);
    };

    match object.get("type") {
        Some(Value::String(kind)) if kind == "exit" => ClassifiedIntent::Exit(body.to_string()),
        Some(Value::String(kind)) if kind == "reverse" => ClassifiedIntent::Reverse(object),
        Some(Value::String(kind)) => {
            ClassifiedIntent::Invalid(InvalidReason::UnknownType(kind.clone()))
        }
        _ => ClassifiedIntent::Invalid(InvalidReason::MissingType),
    }
}
