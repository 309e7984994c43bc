//! Relay error types
//!
//! Every failure while handling one line ends up here and is written back to
//! the host as a single `-32000` error envelope.

use std::error::Error as StdError;
use thiserror::Error;

use crate::protocol::{OutgoingResponse, error_codes, error_response};

/// Failures surfaced to the host as error envelopes
///
/// None of these end the relay; each becomes one line on the output stream.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Request error: {0}")]
    Transport(String),

    #[error("Response parse error: {error} - Raw response: {body}")]
    ResponseParse { error: String, body: String },
}

impl RelayError {
    /// Transport failure from an error and its whole source chain
    pub fn transport(error: &(dyn StdError + 'static)) -> Self {
        let mut message = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        RelayError::Transport(message)
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(error: serde_json::Error) -> Self {
        RelayError::Parse(error.to_string())
    }
}

impl From<RelayError> for OutgoingResponse {
    fn from(error: RelayError) -> Self {
        error_response(error_codes::RELAY_ERROR, error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Outer(Inner);

    #[derive(Debug)]
    struct Inner;

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "error sending request")
        }
    }

    impl fmt::Display for Inner {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "connection refused")
        }
    }

    impl StdError for Inner {}

    impl StdError for Outer {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }

    fn message_of(error: RelayError) -> (i32, String) {
        match OutgoingResponse::from(error) {
            OutgoingResponse::Error(envelope) => (envelope.error.code, envelope.error.message),
            other => panic!("Expected error envelope, got: {other:?}"),
        }
    }

    #[test]
    fn test_status_error_carries_code_and_body() {
        let (code, message) = message_of(RelayError::HttpStatus {
            status: 500,
            body: "\"boom\"".to_string(),
        });
        assert_eq!(code, -32000);
        assert!(message.contains("500"));
        assert!(message.contains("boom"));
    }

    #[test]
    fn test_response_parse_error_carries_raw_body() {
        let (_, message) = message_of(RelayError::ResponseParse {
            error: "expected value at line 1 column 1".to_string(),
            body: "<html>".to_string(),
        });
        assert_eq!(
            message,
            "Response parse error: expected value at line 1 column 1 - Raw response: <html>"
        );
    }

    #[test]
    fn test_transport_error_includes_source_chain() {
        let error = RelayError::transport(&Outer(Inner));
        assert_eq!(
            error.to_string(),
            "Request error: error sending request: connection refused"
        );
    }

    #[test]
    fn test_parse_error_from_serde() {
        let serde_error = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let (code, message) = message_of(serde_error.into());
        assert_eq!(code, -32000);
        assert!(message.starts_with("Parse error: "));
    }
}
