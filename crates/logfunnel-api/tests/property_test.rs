//! Property-based tests for normalization invariants.
//!
//! Uses randomly generated batches to verify the invariants the sink
//! relies on: length and order preservation, idempotent time re-rendering,
//! and the delay-policy boundary.

#![allow(clippy::unwrap_used)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use logfunnel_api::normalize::normalize;
use logfunnel_core::{OrganizationContext, RawEvent, TrustedContext, UserContext};
use proptest::prelude::*;
use serde_json::Map;

fn context() -> TrustedContext {
    TrustedContext {
        user: Some(UserContext {
            email: "ada@example.com".into(),
            role_id: "r-7".into(),
            user_name: "ada".into(),
            user_id: "u-42".into(),
        }),
        organization: Some(OrganizationContext {
            name: "Example Corp".into(),
            organization_id: "org-9".into(),
        }),
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

/// Events offset from `now` by up to ±50 hours, tagged with their index.
fn batch_strategy() -> impl Strategy<Value = Vec<(i64, RawEvent)>> {
    prop::collection::vec(-180_000i64..180_000, 0..24).prop_map(|offsets| {
        offsets
            .into_iter()
            .enumerate()
            .map(|(index, offset_secs)| {
                let time = now() + Duration::seconds(offset_secs);
                let mut data = Map::new();
                data.insert("index".into(), serde_json::json!(index));
                let event = RawEvent {
                    time: time.to_rfc3339(),
                    data,
                    extra: Map::new(),
                };
                (offset_secs, event)
            })
            .collect()
    })
}

proptest! {
    /// Normalization never reorders, drops, or invents events.
    #[test]
    fn length_and_order_are_preserved(batch in batch_strategy()) {
        let events: Vec<RawEvent> = batch.iter().map(|(_, e)| e.clone()).collect();
        let input_len = events.len();

        let normalized = normalize(events, &context(), "10.0.0.1", now()).unwrap();

        prop_assert_eq!(normalized.len(), input_len);
        for (index, event) in normalized.iter().enumerate() {
            prop_assert_eq!(event.data["index"].as_u64().unwrap() as usize, index);
        }
    }

    /// Re-rendering an already-normalized time is a fixed point.
    #[test]
    fn time_rendering_is_idempotent(batch in batch_strategy()) {
        let events: Vec<RawEvent> = batch.iter().map(|(_, e)| e.clone()).collect();

        let first = normalize(events, &context(), "10.0.0.1", now()).unwrap();
        let replayed: Vec<RawEvent> = first
            .iter()
            .map(|e| RawEvent { time: e.time.clone(), data: Map::new(), extra: Map::new() })
            .collect();
        let second = normalize(replayed, &context(), "10.0.0.1", now()).unwrap();

        for (a, b) in first.iter().zip(&second) {
            prop_assert_eq!(&a.time, &b.time);
        }
    }

    /// The delay flag fires exactly when the event is at least a day old.
    #[test]
    fn delay_policy_matches_event_age(batch in batch_strategy()) {
        let events: Vec<RawEvent> = batch.iter().map(|(_, e)| e.clone()).collect();

        let normalized = normalize(events, &context(), "10.0.0.1", now()).unwrap();

        for ((offset_secs, _), event) in batch.iter().zip(&normalized) {
            let day_old = -offset_secs >= 86_400;
            prop_assert_eq!(event.delayed.is_some(), day_old);
            if day_old {
                prop_assert_eq!(&event.event_time, "2024-06-15T00:00:00.000Z");
            } else {
                prop_assert_eq!(&event.event_time, &event.time);
            }
        }
    }

    /// Every normalized event carries the full identity object.
    #[test]
    fn identity_is_attached_to_every_event(batch in batch_strategy()) {
        let events: Vec<RawEvent> = batch.iter().map(|(_, e)| e.clone()).collect();

        let normalized = normalize(events, &context(), "10.0.0.1", now()).unwrap();

        for event in &normalized {
            prop_assert_eq!(event.data["user"]["orgId"].as_str().unwrap(), "org-9");
            prop_assert_eq!(event.data["user"]["ip"].as_str().unwrap(), "10.0.0.1");
        }
    }
}
