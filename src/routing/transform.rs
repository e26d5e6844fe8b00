//! Reverse signal → the two downstream order bodies.
//!
//! Copied fields keep their JSON value as sent (string, number or null);
//! a field absent from the signal is left out of the derived body. Integral
//! floats such as `10.0` or `1e2` are written as plain integers.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::upstream::Outbound;

/// Phase 1: close the current position at market.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitLeg {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pair: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_account_type: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal_id: Option<Value>,
    pub order_type: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

/// Phase 2: open the opposite position.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryLeg {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pair: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_account_type: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_size_percentage: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal_id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_type: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leverage: Option<Value>,
}

/// Both legs of one reverse request.
#[derive(Debug, Clone, PartialEq)]
pub struct ReverseTransform {
    pub exit: ExitLeg,
    pub entry: EntryLeg,
}

impl ReverseTransform {
    pub fn from_signal(signal: &Map<String, Value>) -> Self {
        let field = |name: &str| signal.get(name).cloned().map(canonical);

        let exit = ExitLeg {
            key: field("key"),
            pair: field("pair"),
            exchange: field("exchange"),
            exchange_account_type: field("exchangeAccountType"),
            signal_id: field("signalId"),
            order_type: "market",
            kind: "exit",
        };

        let entry = EntryLeg {
            key: field("key"),
            pair: field("pair"),
            exchange: field("exchange"),
            exchange_account_type: field("exchangeAccountType"),
            position_size_percentage: field("positionSizePercentage"),
            signal_id: field("signalId"),
            side: field("entrySide"),
            order_type: field("entryOrderType"),
            leverage: field("entryLeverage"),
        };

        Self { exit, entry }
    }
}

/// Largest float that still maps to an exact integer (2^53).
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

fn canonical(value: Value) -> Value {
    match value {
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() <= MAX_EXACT_INTEGER => Value::from(f as i64),
            _ => Value::Number(n),
        },
        Value::Array(items) => Value::Array(items.into_iter().map(canonical).collect()),
        Value::Object(map) => {
            Value::Object(map.into_iter().map(|(k, v)| (k, canonical(v))).collect())
        }
        other => other,
    }
}

impl ExitLeg {
    pub fn to_outbound(&self) -> Result<Outbound, serde_json::Error> {
        serde_json::to_string(self).map(Outbound::Json)
    }
}

impl EntryLeg {
    pub fn to_outbound(&self) -> Result<Outbound, serde_json::Error> {
        serde_json::to_string(self).map(Outbound::Json)
    }
}
