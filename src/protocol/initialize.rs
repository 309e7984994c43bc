//! MCP initialize handshake
//!
//! The relay answers `initialize` itself so the host can finish capability
//! negotiation without a round trip to the remote server.

use serde::Serialize;
use serde_json::Value;

use super::jsonrpc::{OutgoingResponse, error_codes, error_response, success_response};

/// MCP protocol version advertised to the host.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Identity of the remote server the relay stands in for.
pub const SERVER_NAME: &str = "spectrum2-mcp-server";
pub const SERVER_VERSION: &str = "0.1.0";

/// Tool-related capability.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ToolCapability {}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ServerCapabilities {
    pub tools: ToolCapability,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

/// Result of the `initialize` request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    pub server_info: ServerInfo,
}

impl Default for InitializeResult {
    fn default() -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities::default(),
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
        }
    }
}

/// Build the reply to an `initialize` request carrying `id`.
pub fn initialize_response(id: Option<Value>) -> OutgoingResponse {
    match serde_json::to_value(InitializeResult::default()) {
        Ok(result) => success_response(id, result),
        Err(e) => error_response(error_codes::RELAY_ERROR, e.to_string()),
    }
}
