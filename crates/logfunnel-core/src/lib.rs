//! Core domain types for the logfunnel ingestion service.
//!
//! Provides the trusted identity types produced by signed-envelope
//! verification, the raw and enriched event shapes that flow through the
//! normalization pipeline, the error taxonomy, and the clock abstraction
//! used to inject "now" into request handling. All other crates depend on
//! these foundational types.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod context;
pub mod error;
pub mod event;
pub mod time;

pub use context::{OrganizationContext, TrustedContext, UserContext, UserMetadata};
pub use error::{CollectorError, Result};
pub use event::{EnrichedEvent, RawEvent};
pub use time::{Clock, RealClock, TestClock};
