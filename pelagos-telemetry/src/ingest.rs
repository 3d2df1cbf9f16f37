//! The telemetry validation gate.

use crate::store::EventStore;
use chrono::{DateTime, NaiveDateTime, Utc};
use pelagos_core::{
    new_event_id, EventTrigger, PelagosResult, RawTagEvent, TagEvent, Timestamp, ValidationError,
};
use std::sync::Arc;

/// Validates, normalizes, and persists incoming tag events.
///
/// This is the exclusive append path into the event store: `TagEvent`
/// values are only constructed here, after every field has been checked.
/// A rejected event reports *all* offending fields and leaves the store
/// untouched; one malformed event never affects others.
pub struct TelemetryIngestor {
    store: Arc<dyn EventStore>,
}

impl TelemetryIngestor {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn EventStore> {
        &self.store
    }

    /// Validate a raw payload and append the resulting event.
    ///
    /// On success the event carries a freshly assigned unique id. On
    /// validation failure the error lists every rejected field.
    pub async fn ingest(&self, raw: RawTagEvent) -> PelagosResult<TagEvent> {
        let (timestamp, trigger) = validate(&raw)?;
        if trigger == EventTrigger::Unknown && raw.event_trigger.trim() != "unknown" {
            tracing::debug!(
                tag_id = %raw.tag_id,
                trigger = %raw.event_trigger,
                "Unrecognized event trigger mapped to unknown"
            );
        }

        let event = TagEvent {
            id: new_event_id(),
            tag_id: raw.tag_id.trim().to_string(),
            latitude: raw.latitude,
            longitude: raw.longitude,
            timestamp,
            event_trigger: trigger,
            event_confidence: raw.event_confidence,
            depth_m: raw.depth_m,
            acceleration: raw.acceleration,
            env_temperature_c: raw.env_temperature_c,
            salinity_psu: raw.salinity_psu,
            battery_level_pct: raw.battery_level_pct,
            received_at: Utc::now(),
        };

        self.store.append(event.clone()).await?;
        tracing::info!(
            tag_id = %event.tag_id,
            event_id = %event.id,
            trigger = %event.event_trigger,
            "Stored tag event"
        );
        Ok(event)
    }

    /// Most-recent-first events, bounded by `limit`.
    pub async fn list_recent(&self, limit: usize) -> PelagosResult<Vec<TagEvent>> {
        self.store.list_recent(limit).await
    }
}

/// Check every field of a raw payload, accumulating failures.
fn validate(raw: &RawTagEvent) -> Result<(Timestamp, EventTrigger), ValidationError> {
    let mut errors = ValidationError::empty();

    if raw.tag_id.trim().is_empty() {
        errors.push("tag_id", "must be non-empty");
    }
    if !raw.latitude.is_finite() || !(-90.0..=90.0).contains(&raw.latitude) {
        errors.push("latitude", "must be within [-90, 90]");
    }
    if !raw.longitude.is_finite() || !(-180.0..=180.0).contains(&raw.longitude) {
        errors.push("longitude", "must be within [-180, 180]");
    }
    if !raw.event_confidence.is_finite() || !(0.0..=1.0).contains(&raw.event_confidence) {
        errors.push("event_confidence", "must be within [0, 1]");
    }

    let timestamp = match parse_timestamp(&raw.timestamp) {
        Some(ts) => ts,
        None => {
            errors.push("timestamp", "must be an ISO-8601 instant");
            Utc::now() // Placeholder; discarded because errors is non-empty.
        }
    };

    if let Some(depth) = raw.depth_m {
        if !depth.is_finite() || depth < 0.0 {
            errors.push("depth_m", "must be a non-negative number");
        }
    }
    if let Some(accel) = &raw.acceleration {
        if accel.is_empty() || accel.iter().any(|a| !a.is_finite()) {
            errors.push("acceleration", "must be a non-empty list of finite numbers");
        }
    }
    if let Some(temp) = raw.env_temperature_c {
        if !temp.is_finite() {
            errors.push("env_temperature_c", "must be a finite number");
        }
    }
    if let Some(salinity) = raw.salinity_psu {
        if !salinity.is_finite() || salinity < 0.0 {
            errors.push("salinity_psu", "must be a non-negative number");
        }
    }
    if let Some(battery) = raw.battery_level_pct {
        if !(0..=100).contains(&battery) {
            errors.push("battery_level_pct", "must be within [0, 100]");
        }
    }

    errors.into_result()?;
    Ok((timestamp, EventTrigger::from_wire(&raw.event_trigger)))
}

/// Parse an ISO-8601 instant; naive timestamps are interpreted as UTC.
fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

// ============================================================================
// TESTS
// ============================================================================
