//! Error types and result handling for the ingestion pipeline.
//!
//! Defines a structured error taxonomy with codes for client
//! disambiguation. Every error is terminal for the current request: the
//! batch fails atomically, nothing is retried, and the failure surfaces as
//! a single HTTP 400 response carrying the error message.

use thiserror::Error;

/// Result type alias using `CollectorError`.
pub type Result<T> = std::result::Result<T, CollectorError>;

/// Collector error types with stable codes.
#[derive(Debug, Error)]
pub enum CollectorError {
    // Envelope errors (E1001-E1008)
    /// Signed request token absent or empty (E1001).
    #[error("[E1001] Missing signed request token")]
    MissingToken,

    /// Signing key absent or empty (E1002).
    #[error("[E1002] Missing signing key")]
    MissingKey,

    /// Token does not split into signature and payload (E1003).
    #[error("[E1003] Malformed signed request token")]
    MalformedToken,

    /// Token payload segment is empty (E1004).
    #[error("[E1004] Missing token payload")]
    MissingPayload,

    /// HMAC digest does not match the declared signature (E1005).
    #[error("[E1005] Invalid signature: HMAC validation failed")]
    InvalidSignature,

    /// Payload segment is not valid base64 (E1006).
    #[error("[E1006] Invalid payload encoding: {reason}")]
    InvalidPayloadEncoding {
        /// Decoder error description
        reason: String,
    },

    /// Decoded payload is not valid JSON (E1007).
    #[error("[E1007] Invalid payload JSON: {reason}")]
    InvalidPayloadJson {
        /// Parser error description
        reason: String,
    },

    /// Decoded payload has no `context` field (E1008).
    #[error("[E1008] Token payload has no context")]
    MissingContext,

    // Batch errors (E2001-E2003)
    /// Trusted context lacks a required sub-object (E2001).
    #[error("[E2001] Trusted context missing {field}")]
    EmptyContext {
        /// Name of the absent sub-object (`user` or `organization`)
        field: &'static str,
    },

    /// An event's time field could not be parsed (E2002).
    #[error("[E2002] Invalid event time: {value}")]
    InvalidEventTime {
        /// The unparseable time value as received
        value: String,
    },

    /// Request body is not a JSON array of events (E2003).
    #[error("[E2003] Malformed event batch: {reason}")]
    MalformedBatch {
        /// What the body actually was
        reason: String,
    },

    // Sink errors (E3001)
    /// The aggregation sink rejected or errored on the batch (E3001).
    #[error("[E3001] Sink submission failed: {message}")]
    SinkSubmission {
        /// Sink error description
        message: String,
    },

    /// Generic error for wrapping other errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CollectorError {
    /// Returns the error code (E1001-E3001).
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingToken => "E1001",
            Self::MissingKey => "E1002",
            Self::MalformedToken => "E1003",
            Self::MissingPayload => "E1004",
            Self::InvalidSignature => "E1005",
            Self::InvalidPayloadEncoding { .. } => "E1006",
            Self::InvalidPayloadJson { .. } => "E1007",
            Self::MissingContext => "E1008",
            Self::EmptyContext { .. } => "E2001",
            Self::InvalidEventTime { .. } => "E2002",
            Self::MalformedBatch { .. } => "E2003",
            Self::SinkSubmission { .. } => "E3001",
            Self::Other(_) => "E9999",
        }
    }
}
