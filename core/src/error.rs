//! Error types carried inside an `Outcome`.
//!
//! # Design
//! None of these errors ever crosses the `execute` boundary as an `Err`; the
//! executor folds them into `Outcome::transport_failure`. Network failures
//! keep the transport's message as a `String` so the error stays independent
//! of the transport crate. A remote API error (non-2xx with a JSON body) is
//! not represented here at all: it is a normal, classified outcome.

use thiserror::Error;

/// Why a request attempt did not produce a classified payload.
#[derive(Debug, Error)]
pub enum TransportError {
    /// No base URL was configured, or it has no host.
    #[error("missing URL: a base URL with a host must be set before executing")]
    MissingUrl,

    /// No HTTP method was selected.
    #[error("missing method: an HTTP method must be set before executing")]
    MissingMethod,

    #[error("host lookup failed: {0}")]
    Dns(String),

    #[error("connection failed: {0}")]
    Connect(String),

    /// The connect or read ceiling elapsed.
    #[error("timed out: {0}")]
    Timeout(String),

    #[error("TLS failure: {0}")]
    Tls(String),

    #[error("I/O failure: {0}")]
    Io(String),

    /// The finalized request could not be expressed on the wire.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A non-empty response body was not valid JSON.
    #[error("response body for status {status} is not valid JSON: {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}

impl TransportError {
    /// True for the two configuration checks made before any network call.
    pub fn is_configuration(&self) -> bool {
        matches!(self, TransportError::MissingUrl | TransportError::MissingMethod)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_are_flagged() {
        assert!(TransportError::MissingUrl.is_configuration());
        assert!(TransportError::MissingMethod.is_configuration());
        assert!(!TransportError::Timeout("read".to_string()).is_configuration());
    }

    #[test]
    fn decode_error_mentions_status() {
        let source = serde_json::from_slice::<serde_json::Value>(b"nope").unwrap_err();
        let err = TransportError::Decode { status: 502, source };
        assert!(err.to_string().contains("502"));
    }
}
