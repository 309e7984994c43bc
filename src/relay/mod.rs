//! The stdio-to-HTTP relay
//!
//! Reads newline-delimited JSON from the input stream, answers `initialize`
//! locally, forwards everything else to the [`Upstream`] and writes exactly
//! one line per decoded message back to the output stream.
//!
//! Each forward runs as its own task. Lines are framed and dispatched in
//! arrival order, but replies are written in completion order.

pub mod dispatcher;
pub mod error;
pub mod upstream;

pub use dispatcher::{Dispatch, dispatch_line, forward};
pub use upstream::{DEFAULT_ENDPOINT, HttpUpstream, Upstream, UpstreamConfig};

use futures::StreamExt;
use std::io;
use std::sync::Arc;
use tokio::io::AsyncRead;
use tokio::task::JoinSet;
use tokio_util::codec::FramedRead;
use tracing::{Instrument, Level, debug, error, info, info_span};
use uuid::Uuid;

use crate::io::{LineFramer, OutputSink};
use crate::log_relay_message;
use crate::protocol::OutgoingResponse;

/// Bridges one input stream to one upstream
pub struct Relay {
    upstream: Arc<dyn Upstream>,
    output: OutputSink,
    in_flight: JoinSet<()>,
}

impl Relay {
    pub fn new(upstream: Arc<dyn Upstream>, output: OutputSink) -> Self {
        Self {
            upstream,
            output,
            in_flight: JoinSet::new(),
        }
    }

    /// Process `input` until it ends, then wait for in-flight forwards
    ///
    /// Only a read failure on `input` is returned as an error, and even then
    /// pending forwards are allowed to finish first.
    pub async fn run<R>(mut self, input: R) -> io::Result<()>
    where
        R: AsyncRead + Unpin,
    {
        let mut lines = FramedRead::new(input, LineFramer::new());
        let mut result = Ok(());

        while let Some(line) = lines.next().await {
            match line {
                Ok(line) => self.handle_line(&line),
                Err(e) => {
                    error!("Failed to read input stream: {}", e);
                    result = Err(e);
                    break;
                }
            }
            self.reap_finished();
        }

        info!(
            "Input stream closed, waiting for {} in-flight forwards",
            self.in_flight.len()
        );
        while let Some(joined) = self.in_flight.join_next().await {
            if let Err(e) = joined {
                error!("Forward task failed: {}", e);
            }
        }

        result
    }

    fn handle_line(&mut self, line: &str) {
        match dispatch_line(line) {
            Dispatch::Immediate(response) => emit(&self.output, &response),
            Dispatch::Forward(message) => {
                log_relay_message!(
                    Level::DEBUG,
                    "inbound",
                    message.method().unwrap_or_default(),
                    message.params()
                );

                let span = info_span!(
                    "forward",
                    request_id = %Uuid::new_v4(),
                    method = message.method().unwrap_or_default()
                );
                let upstream = Arc::clone(&self.upstream);
                let output = self.output.clone();

                self.in_flight.spawn(
                    async move {
                        let response = forward(upstream.as_ref(), &message).await;
                        emit(&output, &response);
                    }
                    .instrument(span),
                );
            }
        }
    }

    /// Drop bookkeeping for forwards that already completed
    fn reap_finished(&mut self) {
        while let Some(joined) = self.in_flight.try_join_next() {
            if let Err(e) = joined {
                error!("Forward task failed: {}", e);
            }
        }
    }
}

fn emit(output: &OutputSink, response: &OutgoingResponse) {
    log_relay_message!(
        Level::TRACE,
        "outbound",
        if response.is_error() { "error" } else { "result" },
        response
    );

    if let Err(e) = output.send(response) {
        error!("Failed to emit response: {}", e);
    } else {
        debug!("Response queued for output");
    }
}
