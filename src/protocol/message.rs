//! Incoming message classification
//!
//! Lines are decoded permissively into a [`serde_json::Value`] and then
//! classified by their `id`. The decoded value is kept whole so it can be
//! forwarded byte-for-byte equivalent, unknown fields included.

use serde_json::Value;

/// Method answered locally instead of being forwarded
pub const INITIALIZE_METHOD: &str = "initialize";

/// A decoded line from the input stream
#[derive(Debug, Clone, PartialEq)]
pub enum IncomingMessage {
    /// Carries a truthy `id` and expects a correlated reply
    Request {
        id: Value,
        method: Option<String>,
        payload: Value,
    },
    /// No `id`, or an `id` that is falsy (`0`, `""`, `false`, `null`)
    Notification {
        method: Option<String>,
        payload: Value,
    },
}

impl IncomingMessage {
    /// Decode one framed line
    pub fn decode(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line).map(Self::from_value)
    }

    /// Classify an already decoded JSON value
    pub fn from_value(payload: Value) -> Self {
        let method = payload
            .get("method")
            .and_then(Value::as_str)
            .map(str::to_owned);

        match payload.get("id").filter(|id| is_truthy(id)).cloned() {
            Some(id) => IncomingMessage::Request {
                id,
                method,
                payload,
            },
            None => IncomingMessage::Notification { method, payload },
        }
    }

    pub fn method(&self) -> Option<&str> {
        match self {
            IncomingMessage::Request { method, .. }
            | IncomingMessage::Notification { method, .. } => method.as_deref(),
        }
    }

    /// The full decoded value, as it will be forwarded
    pub fn payload(&self) -> &Value {
        match self {
            IncomingMessage::Request { payload, .. }
            | IncomingMessage::Notification { payload, .. } => payload,
        }
    }

    /// The `id` key exactly as sent, falsy values included
    pub fn raw_id(&self) -> Option<&Value> {
        self.payload().get("id")
    }

    pub fn params(&self) -> Option<&Value> {
        self.payload().get("params")
    }

    pub fn is_initialize(&self) -> bool {
        self.method() == Some(INITIALIZE_METHOD)
    }
}

/// JavaScript-style truthiness of a JSON value
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
