//! JSON-RPC message model for the relay
//!
//! - **Message**: classification of decoded input lines
//! - **JSON-RPC**: envelopes written to the output stream
//! - **Initialize**: the locally answered MCP handshake

pub mod initialize;
pub mod jsonrpc;
pub mod message;

pub use initialize::initialize_response;
pub use jsonrpc::{OutgoingResponse, error_codes, error_response, success_response};
pub use message::IncomingMessage;
