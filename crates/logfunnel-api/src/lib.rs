//! Logfunnel HTTP API.
//!
//! Hosts the two components with real correctness constraints — the
//! signed-envelope verifier and the event normalizer — plus the axum
//! surface that wires them to the transport: one POST ingestion route,
//! health probes, and the middleware stack.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod envelope;
pub mod handlers;
pub mod normalize;
pub mod server;

pub use config::Config;
pub use server::{create_router, start_server, AppState};
