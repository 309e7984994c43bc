//! Newline-delimited message framing
//!
//! Splits the raw input byte stream into complete lines. The codec's read
//! buffer is the stream buffer: after every decode pass it holds at most one
//! unterminated line, which waits there for the next chunk.
//!
//! Framing works on bytes rather than characters. `\n` never occurs inside a
//! multi-byte UTF-8 sequence, so a chunk boundary that falls in the middle of
//! a character cannot move a line boundary.

use bytes::BytesMut;
use std::io;
use tokio_util::codec::Decoder;
use tracing::{trace, warn};

/// Line framing codec for the relay's input stream
#[derive(Debug, Default)]
pub struct LineFramer {
    /// Prefix of the buffer already searched for a newline
    scanned: usize,
}

impl LineFramer {
    /// Create a framer with nothing scanned yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract the next non-blank line, leaving any partial line in `buffer`
    fn next_line(&mut self, buffer: &mut BytesMut) -> Option<String> {
        loop {
            let Some(offset) = buffer[self.scanned..].iter().position(|b| *b == b'\n') else {
                self.scanned = buffer.len();
                return None;
            };

            let end = self.scanned + offset;
            self.scanned = 0;

            let raw = buffer.split_to(end + 1);
            let text = String::from_utf8_lossy(strip_line_ending(&raw[..end]));

            if text.trim().is_empty() {
                trace!("LineFramer: skipping blank line");
                continue;
            }

            trace!("LineFramer: framed line ({} bytes)", end);
            return Some(text.into_owned());
        }
    }
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}

impl Decoder for LineFramer {
    type Item = String;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        Ok(self.next_line(src))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(line) = self.next_line(src) {
            return Ok(Some(line));
        }

        // An unterminated tail was never a complete message
        if !src.is_empty() {
            warn!(
                "LineFramer: discarding {} bytes of unterminated input at end of stream",
                src.len()
            );
            src.clear();
            self.scanned = 0;
        }

        Ok(None)
    }
}
