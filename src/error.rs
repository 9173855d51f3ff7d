//! Error types for label rendering and printer transport.
//!
//! Rendering failures abort a print before anything reaches the network and
//! are returned as [`Error`]. Transport failures are expected operational
//! events; they are described by [`SendError`] and folded into a
//! [`PrintResult`](crate::PrintResult) instead of being raised.

use std::time::Duration;
use thiserror::Error;

/// Main error type for building a label program.
#[derive(Error, Debug)]
pub enum Error {
    /// Symbol data was empty.
    ///
    /// The caller is expected to embed at least a URL into the symbol, an
    /// empty payload always indicates a bug upstream.
    #[error("Symbol data is empty")]
    EmptyData,

    /// The symbology library could not encode the data.
    ///
    /// Occurs when the payload exceeds the capacity of the largest symbol
    /// version at the configured error correction level.
    #[error(transparent)]
    Encode(#[from] qrcode::types::QrError),

    /// Invalid configuration parameter provided.
    ///
    /// Raised for unparsable environment values or a zero timeout.
    #[error("Invalid configuration parameter: {0}")]
    InvalidConfig(String),
}

/// Reasons a label program could not be delivered to the printer.
#[derive(Error, Debug)]
pub enum SendError {
    /// No connection could be established.
    #[error("printer unreachable at {addr}: {source}")]
    Unreachable {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The connection was established but writing the program failed.
    #[error("send error to {addr}: {source}")]
    Write {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Connect or write did not complete before the deadline.
    #[error("timeout after {}ms talking to {addr}", .timeout.as_millis())]
    Timeout { addr: String, timeout: Duration },
}

impl SendError {
    /// Short category label, stable across messages.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Unreachable { .. } => "printer unreachable",
            Self::Write { .. } => "send error",
            Self::Timeout { .. } => "timeout",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn messages_start_with_category() {
        let errors = vec![
            SendError::Unreachable {
                addr: "10.0.0.1:9100".to_string(),
                source: io::Error::from(io::ErrorKind::ConnectionRefused),
            },
            SendError::Write {
                addr: "10.0.0.1:9100".to_string(),
                source: io::Error::from(io::ErrorKind::BrokenPipe),
            },
            SendError::Timeout {
                addr: "10.0.0.1:9100".to_string(),
                timeout: Duration::from_millis(250),
            },
        ];

        for err in errors {
            assert!(err.to_string().starts_with(err.category()), "{}", err);
        }
    }

    #[test]
    fn timeout_message_carries_duration() {
        let err = SendError::Timeout {
            addr: "printer:9100".to_string(),
            timeout: Duration::from_millis(1500),
        };
        assert_eq!(err.to_string(), "timeout after 1500ms talking to printer:9100");
    }
}
