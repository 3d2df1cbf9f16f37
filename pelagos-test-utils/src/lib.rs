//! PELAGOS Test Utilities
//!
//! Centralized test infrastructure for the PELAGOS workspace:
//! - Fixtures: synthetic regions, raster layers, model artifacts, tag events
//! - Proptest generators for coordinates and telemetry payloads
//! - Custom assertions for error-taxonomy checks

// Re-export the in-memory store from its source crate
pub use pelagos_telemetry::InMemoryEventStore;

// Re-export core types for convenience
pub use pelagos_core::{
    BoundingBox, CellFeatures, Covariate, CovariateVector, EventTrigger, GridCell, HotspotResult,
    MissingValuePolicy, PelagosConfig, PelagosError, PelagosResult, PredictionMode,
    PredictionSource, RawTagEvent, Region, TagEvent, Timestamp, ValidationError,
};

use pelagos_predict::ModelArtifact;
use pelagos_raster::{FeatureAssembler, RasterLayer, RasterStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built fixtures for common testing scenarios.

    use super::*;

    /// Bounding box used by the synthetic test region: 2 degrees on a side,
    /// centered near (-13.0, 46.0).
    pub fn test_bbox() -> BoundingBox {
        BoundingBox::new(-12.0, -14.0, 47.0, 45.0).expect("fixture bbox is valid")
    }

    /// A small named study region over [`test_bbox`].
    pub fn test_region() -> Region {
        Region::new("testbed", test_bbox())
    }

    /// A 4x4 layer over the test region where every cell holds `value`.
    pub fn uniform_layer(covariate: Covariate, value: f64) -> RasterLayer {
        RasterLayer {
            covariate,
            bbox: test_bbox(),
            rows: 4,
            cols: 4,
            nodata: None,
            values: vec![value; 16],
        }
    }

    /// A 4x4 layer whose values increase row-major from `start` in steps
    /// of `step`. Useful when a test needs distinguishable cells.
    pub fn gradient_layer(covariate: Covariate, start: f64, step: f64) -> RasterLayer {
        RasterLayer {
            covariate,
            bbox: test_bbox(),
            rows: 4,
            cols: 4,
            nodata: None,
            values: (0..16).map(|i| start + step * i as f64).collect(),
        }
    }

    /// A raster store over the test region holding the given layers.
    pub fn store_with(layers: Vec<RasterLayer>) -> Arc<RasterStore> {
        Arc::new(
            RasterStore::from_layers(test_region(), layers).expect("fixture layers are valid"),
        )
    }

    /// A store with uniform SST and chlorophyll coverage, the minimal
    /// environment a predictor chain needs.
    pub fn covered_store() -> Arc<RasterStore> {
        store_with(vec![
            uniform_layer(Covariate::Sst, 26.0),
            uniform_layer(Covariate::Chlorophyll, 0.4),
        ])
    }

    /// An assembler over [`covered_store`] with zero-substitution policy.
    pub fn covered_assembler() -> FeatureAssembler {
        FeatureAssembler::new(
            covered_store(),
            vec![Covariate::Sst, Covariate::Chlorophyll],
            MissingValuePolicy::Zero,
        )
    }

    /// Write a layer under `<dir>/<region_name>/<covariate>.json`, the
    /// on-disk shape `RasterStore::load` expects.
    pub fn write_layer(dir: &Path, region_name: &str, layer: &RasterLayer) -> PathBuf {
        let region_dir = dir.join(region_name);
        std::fs::create_dir_all(&region_dir).expect("create region dir");
        let path = region_dir.join(format!("{}.json", layer.covariate.as_str()));
        std::fs::write(&path, serde_json::to_string(layer).expect("serialize layer"))
            .expect("write layer");
        path
    }

    /// A two-feature logistic artifact favoring warm, productive water.
    pub fn linear_artifact() -> ModelArtifact {
        ModelArtifact {
            name: "test-logistic".to_string(),
            features: vec![Covariate::Sst, Covariate::Chlorophyll],
            weights: vec![0.08, 1.5],
            bias: -2.5,
        }
    }

    /// Serialize an artifact to `<dir>/model.json` and return the path.
    pub fn write_artifact(dir: &Path, artifact: &ModelArtifact) -> PathBuf {
        let path = dir.join("model.json");
        std::fs::write(
            &path,
            serde_json::to_string(artifact).expect("serialize artifact"),
        )
        .expect("write artifact");
        path
    }

    /// A raw tag event that passes every validation rule.
    pub fn valid_raw_event() -> RawTagEvent {
        RawTagEvent {
            tag_id: "SHK001".to_string(),
            timestamp: "2026-08-30T10:15:00Z".to_string(),
            latitude: -13.004,
            longitude: 46.237,
            event_trigger: "feeding".to_string(),
            event_confidence: 0.87,
            depth_m: None,
            acceleration: None,
            env_temperature_c: None,
            salinity_psu: None,
            battery_level_pct: None,
        }
    }

    /// A valid raw event with the full extended sensor block populated.
    pub fn raw_event_with_sensors() -> RawTagEvent {
        RawTagEvent {
            depth_m: Some(18.5),
            acceleration: Some(vec![0.1, -0.2, 9.7]),
            env_temperature_c: Some(26.1),
            salinity_psu: Some(35.2),
            battery_level_pct: Some(88),
            ..valid_raw_event()
        }
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for coordinates and telemetry payloads.

    use super::*;
    use proptest::prelude::*;

    /// A latitude anywhere on the globe.
    pub fn arb_latitude() -> impl Strategy<Value = f64> {
        -90.0f64..=90.0
    }

    /// A longitude anywhere on the globe.
    pub fn arb_longitude() -> impl Strategy<Value = f64> {
        -180.0f64..=180.0
    }

    /// A coordinate inside the fixture region's bounding box.
    pub fn arb_test_region_point() -> impl Strategy<Value = (f64, f64)> {
        (-14.0f64..=-12.0, 45.0f64..=47.0)
    }

    /// A bounded event confidence.
    pub fn arb_confidence() -> impl Strategy<Value = f64> {
        0.0f64..=1.0
    }

    /// A wire trigger string, including categories no firmware defines yet.
    pub fn arb_trigger_string() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("feeding".to_string()),
            Just("transiting".to_string()),
            Just("resting".to_string()),
            "[a-z]{3,12}".prop_map(|s| s),
        ]
    }

    /// An RFC 3339 instant within 2020-2030.
    pub fn arb_timestamp_string() -> impl Strategy<Value = String> {
        (1577836800i64..1893456000i64).prop_map(|secs| {
            chrono::DateTime::from_timestamp(secs, 0)
                .expect("in-range timestamp")
                .to_rfc3339()
        })
    }

    /// A raw tag event that always passes validation.
    pub fn arb_valid_raw_event() -> impl Strategy<Value = RawTagEvent> {
        (
            "[A-Z]{3}[0-9]{3}",
            arb_timestamp_string(),
            arb_latitude(),
            arb_longitude(),
            arb_trigger_string(),
            arb_confidence(),
        )
            .prop_map(
                |(tag_id, timestamp, latitude, longitude, event_trigger, event_confidence)| {
                    RawTagEvent {
                        tag_id,
                        timestamp,
                        latitude,
                        longitude,
                        event_trigger,
                        event_confidence,
                        depth_m: None,
                        acceleration: None,
                        env_temperature_c: None,
                        salinity_psu: None,
                        battery_level_pct: None,
                    }
                },
            )
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions for PELAGOS-specific error taxonomy checks.

    use super::*;

    /// Assert that a result is a validation failure naming `field`.
    #[track_caller]
    pub fn assert_rejects_field<T: std::fmt::Debug>(result: &PelagosResult<T>, field: &str) {
        match result {
            Err(PelagosError::Validation(e)) => {
                assert!(
                    e.fields().contains(&field),
                    "Expected a failure on field {:?}, got failures on {:?}",
                    field,
                    e.fields()
                );
            }
            other => panic!("Expected Validation error, got: {:?}", other),
        }
    }

    /// Assert that a result is a prediction-unavailable failure.
    #[track_caller]
    pub fn assert_prediction_unavailable<T: std::fmt::Debug>(result: &PelagosResult<T>) {
        match result {
            Err(PelagosError::Prediction(_)) => {}
            other => panic!("Expected Prediction error, got: {:?}", other),
        }
    }

    /// Assert that every score in a result sits in [0, 1].
    #[track_caller]
    pub fn assert_scores_bounded(result: &HotspotResult) {
        for cell in &result.cells {
            let score = cell.suitability.expect("scored grid cell");
            assert!(
                (0.0..=1.0).contains(&score),
                "Score {} at ({}, {}) out of [0, 1]",
                score,
                cell.latitude,
                cell.longitude
            );
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pelagos_telemetry::TelemetryIngestor;
    use proptest::prelude::*;

    #[test]
    fn test_fixture_layers_are_valid() {
        fixtures::uniform_layer(Covariate::Sst, 26.0)
            .validate()
            .unwrap();
        fixtures::gradient_layer(Covariate::Chlorophyll, 0.1, 0.05)
            .validate()
            .unwrap();
    }

    #[test]
    fn test_fixture_artifact_is_valid() {
        fixtures::linear_artifact().validate().unwrap();
    }

    #[test]
    fn test_written_layer_round_trips_through_store() {
        let dir = tempfile::tempdir().unwrap();
        let layer = fixtures::uniform_layer(Covariate::Sst, 26.0);
        fixtures::write_layer(dir.path(), "testbed", &layer);

        let store =
            RasterStore::load(dir.path(), fixtures::test_region(), &[Covariate::Sst], &[]).unwrap();
        assert_eq!(store.sample(-13.0, 46.0).get(Covariate::Sst), Some(26.0));
    }

    #[test]
    fn test_covered_assembler_produces_confident_cells() {
        let cells = fixtures::covered_assembler().assemble(&fixtures::test_bbox(), 3, 3);
        assert_eq!(cells.len(), 9);
        assert!(cells.iter().all(|c| !c.low_confidence));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn prop_generated_raw_events_pass_validation(raw in generators::arb_valid_raw_event()) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();
            let ingestor = TelemetryIngestor::new(Arc::new(InMemoryEventStore::new()));
            let stored = runtime.block_on(ingestor.ingest(raw.clone()));
            prop_assert!(stored.is_ok(), "generated event rejected: {:?}", stored);
        }

        #[test]
        fn prop_test_region_points_inside_bbox((lat, lon) in generators::arb_test_region_point()) {
            prop_assert!(fixtures::test_bbox().contains(lat, lon));
        }
    }
}
