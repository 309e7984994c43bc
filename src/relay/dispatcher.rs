//! Per-line dispatch
//!
//! Decides, for one framed line, whether the reply can be produced on the
//! spot (malformed input, `initialize`) or needs a round trip upstream.

use std::time::Instant;
use tracing::{Level, warn};

use super::error::RelayError;
use super::upstream::Upstream;
use crate::log_timing;
use crate::protocol::{IncomingMessage, OutgoingResponse, initialize_response, success_response};

/// What to do with one framed line
#[derive(Debug)]
pub enum Dispatch {
    /// The reply is already known
    Immediate(OutgoingResponse),
    /// The message has to go upstream
    Forward(IncomingMessage),
}

/// Decode and classify one line
pub fn dispatch_line(line: &str) -> Dispatch {
    match IncomingMessage::decode(line) {
        Err(e) => {
            warn!("Dropping malformed input line: {}", e);
            Dispatch::Immediate(RelayError::from(e).into())
        }
        // A bare `null` has no fields to classify by
        Ok(message) if message.payload().is_null() => {
            warn!("Dropping null input line");
            Dispatch::Immediate(RelayError::Parse("message is null".to_string()).into())
        }
        Ok(message) if message.is_initialize() => {
            Dispatch::Immediate(initialize_response(message.raw_id().cloned()))
        }
        Ok(message) => Dispatch::Forward(message),
    }
}

/// Forward `message` and translate the outcome into the line to write
pub async fn forward(upstream: &dyn Upstream, message: &IncomingMessage) -> OutgoingResponse {
    let started = Instant::now();
    let outcome = upstream.forward(message.payload()).await;
    log_timing!(Level::DEBUG, "upstream_forward", started.elapsed());

    match (outcome, message) {
        (Ok(body), IncomingMessage::Request { id, .. }) => success_response(Some(id.clone()), body),
        (Ok(body), IncomingMessage::Notification { .. }) => OutgoingResponse::Passthrough(body),
        (Err(e), _) => {
            warn!("Forward failed: {}", e);
            e.into()
        }
    }
}
