//! Output transport - line-delimited JSON writer
//!
//! Every outgoing value is serialized to exactly one line and handed to a
//! single writer task over an unbounded channel. Forwards complete on their
//! own tasks in any order; the channel keeps their lines from interleaving.

use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, trace};

/// Error types for the output transport
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Output stream is closed")]
    Closed,
}

/// Cloneable handle for emitting lines to the output stream
#[derive(Debug, Clone)]
pub struct OutputSink {
    sender: mpsc::UnboundedSender<String>,
}

impl OutputSink {
    /// Spawn the writer task for `writer` and return a handle to it
    ///
    /// The task ends once every clone of the returned sink has been dropped
    /// and all queued lines are written.
    pub fn spawn<W>(writer: W) -> (Self, JoinHandle<()>)
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (sender, receiver) = mpsc::unbounded_channel();
        let handle = tokio::spawn(Self::writer_task(writer, receiver));
        (Self { sender }, handle)
    }

    /// Sink backed by a bare channel, for inspecting output in tests
    #[cfg(test)]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Serialize `message` as one JSON line and queue it for writing
    pub fn send<T: Serialize>(&self, message: &T) -> Result<(), OutputError> {
        let line = serde_json::to_string(message)?;
        self.sender.send(line).map_err(|_| OutputError::Closed)
    }

    async fn writer_task<W>(mut writer: W, mut receiver: mpsc::UnboundedReceiver<String>)
    where
        W: AsyncWrite + Unpin,
    {
        while let Some(mut line) = receiver.recv().await {
            trace!("OutputSink: writing line (length: {})", line.len());
            line.push('\n');

            if let Err(e) = writer.write_all(line.as_bytes()).await {
                error!("Failed to write to output stream: {}", e);
                break;
            }

            if let Err(e) = writer.flush().await {
                error!("Failed to flush output stream: {}", e);
                break;
            }
        }

        trace!("OutputSink: writer task finished");
    }
}
