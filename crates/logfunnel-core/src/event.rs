//! Raw and enriched event shapes for the normalization pipeline.
//!
//! A [`RawEvent`] is exactly what the caller posted: a `time` string, a
//! free-form `data` object, and any other fields, which are preserved
//! untouched through normalization. An [`EnrichedEvent`] is the sink-ready
//! form with normalized timestamps and the identity object attached.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A caller-supplied log event, as received.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEvent {
    /// Event timestamp, ISO-8601-parseable.
    pub time: String,
    /// Free-form event payload.
    pub data: Map<String, Value>,
    /// Any additional top-level fields, passed through unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A sink-ready event with normalized timestamps and attached identity.
///
/// `delayed` is serialized only when the delay policy fired; events inside
/// the acceptance window carry no `delayed` field at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedEvent {
    /// Original event time, re-rendered as ISO-8601.
    pub time: String,
    /// Server receipt time.
    pub send_time: String,
    /// Policy-adjusted timestamp the sink indexes on.
    pub event_time: String,
    /// Present (and true) only when the delay policy adjusted `event_time`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delayed: Option<bool>,
    /// Event payload with `user` identity merged in.
    pub data: Map<String, Value>,
    /// Additional top-level fields carried over from the raw event.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EnrichedEvent {
    /// Organization identifier from the attached identity object.
    ///
    /// The sink groups a whole batch under one organization tag derived
    /// from the first event, so this is read positionally by the caller.
    pub fn user_org_id(&self) -> Option<&str> {
        self.data.get("user")?.get("orgId")?.as_str()
    }
}
