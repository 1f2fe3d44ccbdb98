//! Event batch ingestion handler.
//!
//! Authenticates the signed-request token from the `Authorization` header,
//! normalizes the posted batch, and forwards it to the aggregation sink.
//! Every failure is terminal for the request and surfaces as a single 400
//! response; the batch succeeds or fails atomically.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use logfunnel_core::{CollectorError, EnrichedEvent, RawEvent};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::{envelope, normalize::normalize, server::AppState};

/// Error response body: `{"error": "<message>"}`.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Ingests a batch of log events.
///
/// The signed-request token is the last space-separated segment of the
/// `Authorization` header value; a missing header folds into the
/// missing-token error. The body must be a JSON array of events.
#[instrument(
    name = "collect_events",
    skip(state, headers, body),
    fields(
        content_length = body.len(),
        peer = %peer,
    )
)]
pub async fn collect_events(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let token = bearer_token(&headers);
    let caller_ip = caller_ip(&headers, peer);

    match process_batch(&state, &token, &body, &caller_ip).await {
        Ok(count) => {
            if count == 0 {
                info!("No events to submit");
            } else {
                info!(count, "Submitted events to sink");
            }
            (StatusCode::OK, Json(serde_json::json!({}))).into_response()
        },
        Err(error) => {
            warn!(code = error.code(), %error, "Rejected event batch");
            (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: error.to_string() }))
                .into_response()
        },
    }
}

/// Empty 200 for non-POST methods on the ingestion route.
///
/// Browser clients probe the collector with plain GETs; those get an empty
/// success without touching the pipeline.
pub async fn empty_ok() -> Response {
    StatusCode::OK.into_response()
}

/// Runs the verification and normalization pipeline, then submits.
///
/// Returns the number of events submitted; zero means the batch was empty
/// and the sink was never invoked.
async fn process_batch(
    state: &AppState,
    token: &str,
    body: &[u8],
    caller_ip: &str,
) -> Result<usize, CollectorError> {
    let context = envelope::verify(token, &state.signing_key)?;

    let batch = parse_batch(body)?;
    let events = normalize(batch, &context, caller_ip, state.clock.now_utc())?;

    if events.is_empty() {
        return Ok(0);
    }

    let tags: Vec<String> = events
        .first()
        .and_then(EnrichedEvent::user_org_id)
        .map(|org_id| vec![org_id.to_string()])
        .unwrap_or_default();

    state
        .sink
        .submit(&events, &tags)
        .await
        .map_err(|e| CollectorError::SinkSubmission { message: e.to_string() })?;

    Ok(events.len())
}

/// Parses the request body as a JSON array of raw events.
///
/// A body that is valid JSON but not an array is reported distinctly,
/// naming the type actually seen.
fn parse_batch(body: &[u8]) -> Result<Vec<RawEvent>, CollectorError> {
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| CollectorError::MalformedBatch { reason: e.to_string() })?;

    if !value.is_array() {
        return Err(CollectorError::MalformedBatch {
            reason: format!("expected a JSON array of events, got {}", json_type(&value)),
        });
    }

    serde_json::from_value(value).map_err(|e| CollectorError::MalformedBatch { reason: e.to_string() })
}

fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Extracts the signed-request token from the Authorization header.
///
/// Only the last space-separated segment is used, so any scheme prefix
/// (`Bearer`, `SignedRequest`, ...) is accepted. Missing header yields an
/// empty token, which the verifier rejects as missing.
fn bearer_token(headers: &HeaderMap) -> String {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.rsplit(' ').next())
        .unwrap_or_default()
        .to_string()
}

/// Resolves the caller's address: first hop of `X-Forwarded-For` when
/// present, otherwise the peer socket address.
fn caller_ip(headers: &HeaderMap, peer: SocketAddr) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .unwrap_or_else(|| peer.ip().to_string())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn token_is_last_segment_of_authorization() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("SignedRequest sig.payload"));
        assert_eq!(bearer_token(&headers), "sig.payload");

        headers.insert("authorization", HeaderValue::from_static("sig.payload"));
        assert_eq!(bearer_token(&headers), "sig.payload");
    }

    #[test]
    fn missing_authorization_yields_empty_token() {
        assert_eq!(bearer_token(&HeaderMap::new()), "");
    }

    #[test]
    fn forwarded_header_wins_over_peer_address() {
        let peer: SocketAddr = "192.0.2.1:4711".parse().unwrap();

        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.9, 10.0.0.1"));
        assert_eq!(caller_ip(&headers, peer), "203.0.113.9");

        assert_eq!(caller_ip(&HeaderMap::new(), peer), "192.0.2.1");
    }

    #[test]
    fn non_array_bodies_are_named() {
        let err = parse_batch(br#"{"time": "2024-01-01T00:00:00Z"}"#).unwrap_err();
        assert!(err.to_string().contains("got an object"));

        let err = parse_batch(b"not json at all").unwrap_err();
        assert!(matches!(err, CollectorError::MalformedBatch { .. }));
    }

    #[test]
    fn empty_array_parses_to_empty_batch() {
        assert!(parse_batch(b"[]").unwrap().is_empty());
    }
}
