//! Boundary response envelopes.
//!
//! Every endpoint answers with a `status`-tagged envelope so the excluded
//! transport/UI layer can degrade gracefully without parsing exceptions:
//! a total prediction failure is `{status: "error", hotspots: []}`, never
//! a partial grid and never a panic across the boundary.

use pelagos_core::{
    EventId, HotspotResult, PredictionSource, TagEvent, Timestamp, ValidationFailure,
};
use serde::{Deserialize, Serialize};

/// Envelope status tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// One scored hotspot as exposed to consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotspotPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub prediction_value: f64,
    /// Covariates were substituted for this cell; treat with caution.
    pub low_confidence: bool,
}

/// `GET /hotspots` envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotspotsResponse {
    pub status: ResponseStatus,
    pub hotspots: Vec<HotspotPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PredictionSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HotspotsResponse {
    pub fn success(result: &HotspotResult) -> Self {
        let hotspots = result
            .cells
            .iter()
            .map(|cell| HotspotPoint {
                latitude: cell.latitude,
                longitude: cell.longitude,
                // Facade grids are always fully scored.
                prediction_value: cell.suitability.unwrap_or(0.0),
                low_confidence: cell.low_confidence,
            })
            .collect();
        Self {
            status: ResponseStatus::Success,
            hotspots,
            generated_at: Some(result.generated_at),
            source: Some(result.source),
            error: None,
        }
    }

    /// Total failure: explicit error status with an empty hotspot list.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            hotspots: Vec::new(),
            generated_at: None,
            source: None,
            error: Some(message.into()),
        }
    }
}

/// `POST /events/ingest` envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestResponse {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<EventId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<Vec<ValidationFailure>>,
}

impl IngestResponse {
    pub fn success(event_id: EventId) -> Self {
        Self {
            status: ResponseStatus::Success,
            event_id: Some(event_id),
            field_errors: None,
        }
    }

    pub fn rejected(field_errors: Vec<ValidationFailure>) -> Self {
        Self {
            status: ResponseStatus::Error,
            event_id: None,
            field_errors: Some(field_errors),
        }
    }
}

/// `GET /events` envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventsResponse {
    pub status: ResponseStatus,
    pub events: Vec<TagEvent>,
}

impl EventsResponse {
    pub fn success(events: Vec<TagEvent>) -> Self {
        Self {
            status: ResponseStatus::Success,
            events,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pelagos_core::{CellFeatures, CovariateVector, GridCell};

    fn result_with_one_cell() -> HotspotResult {
        let features = CellFeatures {
            latitude: -13.0,
            longitude: 46.2,
            covariates: CovariateVector::new(),
            low_confidence: true,
        };
        HotspotResult {
            generated_at: Utc::now(),
            source: PredictionSource::Simulated,
            grid_n: 1,
            grid_m: 1,
            cells: vec![GridCell::from_features(features, 0.73)],
        }
    }

    #[test]
    fn test_success_envelope_shape() {
        let response = HotspotsResponse::success(&result_with_one_cell());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["source"], "simulated");
        assert_eq!(json["hotspots"][0]["prediction_value"], 0.73);
        assert_eq!(json["hotspots"][0]["low_confidence"], true);
    }

    #[test]
    fn test_error_envelope_has_empty_hotspots() {
        let response = HotspotsResponse::error("all predictors failed");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["hotspots"].as_array().unwrap().len(), 0);
        assert!(json.get("generated_at").is_none());
    }

    #[test]
    fn test_ingest_envelopes() {
        let ok = IngestResponse::success(pelagos_core::new_event_id());
        assert_eq!(ok.status, ResponseStatus::Success);
        assert!(ok.field_errors.is_none());

        let bad = IngestResponse::rejected(vec![ValidationFailure {
            field: "latitude".to_string(),
            reason: "must be within [-90, 90]".to_string(),
        }]);
        let json = serde_json::to_value(&bad).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["field_errors"][0]["field"], "latitude");
    }
}
