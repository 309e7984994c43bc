//! JSON-RPC 2.0 protocol utilities
//!
//! Provides constants, envelope types and builders for the responses the
//! relay writes, as per https://www.jsonrpc.org/specification

use serde::Serialize;
use serde_json::Value;

// ============================================================================
// JSON-RPC 2.0 Constants
// ============================================================================

/// JSON-RPC 2.0 version identifier
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC 2.0 Error Codes
/// https://www.jsonrpc.org/specification#error_object
pub mod error_codes {
    /// Server error range end - Reserved for implementation-defined server-errors.
    pub const SERVER_ERROR_END: i32 = -32000;

    /// Code carried by every error envelope the relay produces itself.
    pub const RELAY_ERROR: i32 = SERVER_ERROR_END;
}

// ============================================================================
// Envelope Types
// ============================================================================

/// Successful response correlated to a request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuccessEnvelope {
    pub jsonrpc: String,

    /// Omitted entirely when the request had no `id` key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    pub result: Value,
}

/// Error object inside an error envelope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorObject {
    pub code: i32,
    pub message: String,
}

/// Uncorrelated error response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorEnvelope {
    pub jsonrpc: String,
    pub error: ErrorObject,
}

/// Any value the relay writes to its output stream
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutgoingResponse {
    Success(SuccessEnvelope),
    Error(ErrorEnvelope),
    /// Remote body written as-is, with no envelope
    Passthrough(Value),
}

impl OutgoingResponse {
    pub fn is_error(&self) -> bool {
        matches!(self, OutgoingResponse::Error(_))
    }
}

// ============================================================================
// JSON-RPC Response Builders
// ============================================================================

/// Create a successful JSON-RPC response
pub fn success_response(id: Option<Value>, result: Value) -> OutgoingResponse {
    OutgoingResponse::Success(SuccessEnvelope {
        jsonrpc: JSONRPC_VERSION.to_string(),
        id,
        result,
    })
}

/// Create a JSON-RPC error response
pub fn error_response(code: i32, message: String) -> OutgoingResponse {
    OutgoingResponse::Error(ErrorEnvelope {
        jsonrpc: JSONRPC_VERSION.to_string(),
        error: ErrorObject { code, message },
    })
}
