//! Event batch normalization.
//!
//! Transforms a raw batch into a sink-ready one: timestamps are re-rendered
//! as ISO-8601, the server receipt time is stamped on, the delay policy is
//! applied, and the verified identity is merged into each event's payload.
//! Order and length are preserved — the sink derives the whole batch's
//! organization tag from the first event. "Now" is an explicit parameter so
//! the transform stays deterministic under test.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use logfunnel_core::{CollectorError, EnrichedEvent, RawEvent, Result, TrustedContext, UserMetadata};

/// Events older than this are re-timestamped; the sink rejects event times
/// more than a day old.
const MAX_EVENT_AGE: Duration = Duration::hours(24);

/// Normalizes a raw event batch against the verified context.
///
/// # Errors
///
/// - `EmptyContext` when the context lacks its `user` or `organization`
///   sub-object (read eagerly, before any event is touched).
/// - `InvalidEventTime` when an event's `time` field does not parse; the
///   whole batch fails.
pub fn normalize(
    batch: Vec<RawEvent>,
    context: &TrustedContext,
    caller_ip: &str,
    now: DateTime<Utc>,
) -> Result<Vec<EnrichedEvent>> {
    let user = context.user.as_ref().ok_or(CollectorError::EmptyContext { field: "user" })?;
    let organization = context
        .organization
        .as_ref()
        .ok_or(CollectorError::EmptyContext { field: "organization" })?;

    let identity = serde_json::to_value(UserMetadata::from_context(user, organization, caller_ip))
        .map_err(|e| CollectorError::Other(e.into()))?;

    let send_time = render(now);

    batch
        .into_iter()
        .map(|event| {
            let parsed = parse_event_time(&event.time)?;
            let time = render(parsed);

            let (event_time, delayed) = if now.signed_duration_since(parsed) >= MAX_EVENT_AGE {
                (midnight_utc(now), Some(true))
            } else {
                (time.clone(), None)
            };

            let mut data = event.data;
            data.insert("user".to_string(), identity.clone());

            Ok(EnrichedEvent {
                time,
                send_time: send_time.clone(),
                event_time,
                delayed,
                data,
                extra: event.extra,
            })
        })
        .collect()
}

fn parse_event_time(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| CollectorError::InvalidEventTime { value: value.to_string() })
}

/// ISO-8601 with millisecond precision and a `Z` suffix.
fn render(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Midnight UTC of the given instant's date.
fn midnight_utc(time: DateTime<Utc>) -> String {
    format!("{}T00:00:00.000Z", time.format("%Y-%m-%d"))
}
