//! Telemetry tag event types.
//!
//! `RawTagEvent` is the untrusted wire payload emitted by tag firmware;
//! `TagEvent` is the validated record that exists only past the ingestor's
//! validation gate. Events are append-only: once stored, an event's `id`
//! and content never change.

use crate::{EventId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Behavioral classification attached to a tag event.
///
/// Unrecognized trigger strings map to `Unknown` rather than rejecting the
/// event, so newer tag firmware with extra categories keeps ingesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventTrigger {
    Feeding,
    Transiting,
    Resting,
    Unknown,
}

impl EventTrigger {
    pub const fn as_str(&self) -> &'static str {
        match self {
            EventTrigger::Feeding => "feeding",
            EventTrigger::Transiting => "transiting",
            EventTrigger::Resting => "resting",
            EventTrigger::Unknown => "unknown",
        }
    }

    /// Classify a wire trigger string, tolerating unknown categories.
    pub fn from_wire(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "feeding" => EventTrigger::Feeding,
            "transiting" => EventTrigger::Transiting,
            "resting" => EventTrigger::Resting,
            _ => EventTrigger::Unknown,
        }
    }
}

impl fmt::Display for EventTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw telemetry payload as sent by a tracking tag.
///
/// Field set mirrors the tag firmware wire format; everything beyond the
/// position/trigger core is optional because older hardware revisions omit
/// the extended sensor block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTagEvent {
    pub tag_id: String,
    /// ISO-8601 instant; naive timestamps are interpreted as UTC.
    pub timestamp: String,
    pub latitude: f64,
    pub longitude: f64,
    pub event_trigger: String,
    pub event_confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceleration: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_temperature_c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salinity_psu: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_level_pct: Option<i32>,
}

/// A validated, stored telemetry event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagEvent {
    /// Unique, immutable once assigned (UUIDv7, timestamp-sortable).
    pub id: EventId,
    pub tag_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: Timestamp,
    pub event_trigger: EventTrigger,
    /// Bounded confidence in [0, 1].
    pub event_confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceleration: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_temperature_c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salinity_psu: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_level_pct: Option<i32>,
    /// Server-side ingestion instant. Listing recency is keyed by the
    /// event's own `timestamp`; this only breaks ties and records uplink
    /// latency.
    pub received_at: Timestamp,
}

// ============================================================================
// TESTS
// ============================================================================
