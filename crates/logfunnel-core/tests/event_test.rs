//! Wire-shape tests for the event types.
//!
//! The sink and the original callers both speak camelCase JSON; these
//! tests pin the exact field names and the conditional `delayed` flag.

#![allow(clippy::unwrap_used)]

use logfunnel_core::{EnrichedEvent, RawEvent};
use serde_json::Map;

#[test]
fn enriched_event_round_trips_on_the_wire() {
    let mut data = Map::new();
    data.insert("level".into(), serde_json::json!("warn"));
    data.insert("user".into(), serde_json::json!({"orgId": "org-9"}));

    let mut extra = Map::new();
    extra.insert("source".into(), serde_json::json!("browser"));

    let event = EnrichedEvent {
        time: "2024-01-01T00:00:00.000Z".into(),
        send_time: "2024-01-02T00:00:01.000Z".into(),
        event_time: "2024-01-02T00:00:00.000Z".into(),
        delayed: Some(true),
        data,
        extra,
    };

    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["time"], "2024-01-01T00:00:00.000Z");
    assert_eq!(value["sendTime"], "2024-01-02T00:00:01.000Z");
    assert_eq!(value["eventTime"], "2024-01-02T00:00:00.000Z");
    assert_eq!(value["delayed"], true);
    assert_eq!(value["source"], "browser");
    assert_eq!(value["data"]["level"], "warn");

    let back: EnrichedEvent = serde_json::from_value(value).unwrap();
    assert_eq!(back.user_org_id(), Some("org-9"));
}

#[test]
fn raw_event_accepts_minimal_shape() {
    let event: RawEvent =
        serde_json::from_str(r#"{"time": "2024-01-01T00:00:00Z", "data": {}}"#).unwrap();
    assert_eq!(event.time, "2024-01-01T00:00:00Z");
    assert!(event.data.is_empty());
    assert!(event.extra.is_empty());
}

#[test]
fn raw_event_rejects_non_object_data() {
    let result = serde_json::from_str::<RawEvent>(
        r#"{"time": "2024-01-01T00:00:00Z", "data": "not an object"}"#,
    );
    assert!(result.is_err());
}
