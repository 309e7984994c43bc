//! I/O layer - framing and transport for the relay's local line stream
//!
//! - **Framing**: splits the input byte stream into newline-delimited lines
//! - **Transport**: writes outgoing JSON values, one per line
//!
//! Neither layer knows anything about JSON-RPC semantics.

pub mod framing;
pub mod transport;

pub use framing::LineFramer;
pub use transport::OutputSink;
