//! HTTP request handlers for the logfunnel API.
//!
//! One ingestion endpoint does the real work; the rest are probes. All
//! handlers follow the same pattern: validation with errors from the
//! collector taxonomy, tracing for observability, and a standardized
//! error-response shape (`{"error": "<message>"}` with status 400).

pub mod collect;
pub mod health;

pub use collect::{collect_events, empty_ok};
pub use health::{health_check, liveness_check};
