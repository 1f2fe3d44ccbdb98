//! Bulk-submission client for the aggregation sink.
//!
//! Handles request construction, response processing, and error
//! categorization. The [`EventSink`] trait is the seam the ingestion
//! handler is built against, so tests can substitute a recording double
//! and no process-wide client singleton exists.

use std::time::Duration;

use async_trait::async_trait;
use logfunnel_core::EnrichedEvent;
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span, Instrument};

use crate::error::{Result, SinkError};

/// Header carrying the batch's organization tags.
const TAG_HEADER: &str = "X-Event-Tags";

/// Maximum response body length retained in receipts and errors.
const MAX_BODY_LEN: usize = 2048;

/// Configuration for the sink client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Base URL of the aggregation service.
    pub base_url: String,
    /// Customer token identifying the account.
    pub token: String,
    /// Timeout for bulk submissions.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:7080".to_string(),
            token: String::new(),
            timeout: Duration::from_secs(crate::DEFAULT_TIMEOUT_SECONDS),
            user_agent: "Logfunnel/1.0".to_string(),
        }
    }
}

/// Receipt for a successful bulk submission.
#[derive(Debug, Clone)]
pub struct SinkReceipt {
    /// HTTP status code returned by the aggregator.
    pub status_code: u16,
    /// Response body, truncated.
    pub body: String,
    /// Total duration of the request.
    pub duration: Duration,
}

/// Outbound interface to the log-aggregation sink.
///
/// One operation: submit a normalized batch under a set of tags. Returns
/// success or a categorized failure; the caller decides what to tell the
/// original requester.
#[async_trait]
pub trait EventSink: Send + Sync + std::fmt::Debug {
    /// Submits a batch of enriched events grouped under the given tags.
    async fn submit(&self, events: &[EnrichedEvent], tags: &[String]) -> Result<SinkReceipt>;
}

/// Production sink client posting batches over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSink {
    client: reqwest::Client,
    config: SinkConfig,
}

impl HttpSink {
    /// Creates a new sink client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `SinkError::Configuration` if the HTTP client cannot be
    /// built with the provided settings.
    pub fn new(config: SinkConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| SinkError::configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Creates a sink client with default configuration.
    pub fn with_defaults() -> Result<Self> {
        Self::new(SinkConfig::default())
    }

    fn bulk_url(&self) -> String {
        format!("{}/bulk/{}", self.config.base_url.trim_end_matches('/'), self.config.token)
    }

    fn categorize_status(status: u16, body: String) -> SinkError {
        if (400..500).contains(&status) {
            SinkError::ClientStatus { status_code: status, body }
        } else {
            SinkError::ServerStatus { status_code: status, body }
        }
    }

    fn categorize_transport(&self, err: &reqwest::Error) -> SinkError {
        if err.is_timeout() {
            SinkError::Timeout { timeout_seconds: self.config.timeout.as_secs() }
        } else if err.is_connect() {
            SinkError::network(format!("connection failed: {err}"))
        } else {
            SinkError::network(err.to_string())
        }
    }
}

#[async_trait]
impl EventSink for HttpSink {
    async fn submit(&self, events: &[EnrichedEvent], tags: &[String]) -> Result<SinkReceipt> {
        let start_time = std::time::Instant::now();
        let span = info_span!(
            "sink_submit",
            url = %self.bulk_url(),
            events = events.len(),
            tags = tags.len()
        );

        async move {
            debug!("Submitting event batch to sink");

            let mut request = self.client.post(self.bulk_url()).json(events);
            if !tags.is_empty() {
                request = request.header(TAG_HEADER, tags.join(","));
            }

            let response =
                request.send().await.map_err(|e| self.categorize_transport(&e))?;

            let status = response.status().as_u16();
            let body = truncate(response.text().await.unwrap_or_default());

            if (200..300).contains(&status) {
                debug!(status, "Sink accepted batch");
                Ok(SinkReceipt { status_code: status, body, duration: start_time.elapsed() })
            } else {
                Err(Self::categorize_status(status, body))
            }
        }
        .instrument(span)
        .await
    }
}

fn truncate(mut body: String) -> String {
    if body.len() > MAX_BODY_LEN {
        body.truncate(MAX_BODY_LEN);
    }
    body
}
