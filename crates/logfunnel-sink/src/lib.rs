//! HTTP client for the remote log-aggregation sink.
//!
//! The ingestion pipeline hands a normalized batch plus its organization
//! tags to an [`EventSink`]; this crate provides the production
//! implementation ([`HttpSink`]) that posts the batch to the aggregator's
//! bulk endpoint. Submission is one-shot: the service neither retries nor
//! stores failed batches, so errors here are categorized and reported back
//! to the caller of the original request.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod error;

pub use client::{EventSink, HttpSink, SinkConfig, SinkReceipt};
pub use error::{Result, SinkError};

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
