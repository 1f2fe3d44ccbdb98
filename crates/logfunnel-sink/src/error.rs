//! Error types for sink submission.
//!
//! Categorizes failures by transport class so callers can report what the
//! aggregator actually did: refused the connection, timed out, rejected
//! the batch, or failed server-side.

use thiserror::Error;

/// Result type alias for sink operations.
pub type Result<T> = std::result::Result<T, SinkError>;

/// Failure modes for a bulk submission.
#[derive(Debug, Clone, Error)]
pub enum SinkError {
    /// Network-level connectivity failure.
    #[error("network connection failed: {message}")]
    Network {
        /// Error message describing the network failure
        message: String,
    },

    /// HTTP request timeout exceeded.
    #[error("request timeout after {timeout_seconds}s")]
    Timeout {
        /// Number of seconds before the request timed out
        timeout_seconds: u64,
    },

    /// The aggregator rejected the batch (4xx).
    #[error("sink rejected batch: HTTP {status_code}")]
    ClientStatus {
        /// HTTP status code (4xx)
        status_code: u16,
        /// Response body content, truncated
        body: String,
    },

    /// The aggregator failed server-side (5xx).
    #[error("sink server error: HTTP {status_code}")]
    ServerStatus {
        /// HTTP status code (5xx)
        status_code: u16,
        /// Response body content, truncated
        body: String,
    },

    /// Invalid sink configuration.
    #[error("invalid sink configuration: {message}")]
    Configuration {
        /// Configuration error message
        message: String,
    },
}

impl SinkError {
    /// Creates a network error from a message.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network { message: message.into() }
    }

    /// Creates a configuration error from a message.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_status_code() {
        let err = SinkError::ServerStatus { status_code: 503, body: "unavailable".into() };
        assert_eq!(err.to_string(), "sink server error: HTTP 503");
    }

    #[test]
    fn constructor_helpers() {
        assert!(matches!(SinkError::network("refused"), SinkError::Network { .. }));
        assert!(matches!(SinkError::configuration("bad url"), SinkError::Configuration { .. }));
    }
}
