//! Shared application state for route handlers.

use crate::config::ApiConfig;
use pelagos_predict::PredictionService;
use pelagos_telemetry::TelemetryIngestor;
use std::sync::Arc;
use std::time::Instant;

/// State shared across all handlers.
///
/// The two paths are deliberately independent: prediction holds read-only
/// raster data, telemetry owns the append path. Nothing here is mutated
/// by handlers except through those components' own synchronization.
#[derive(Clone)]
pub struct AppState {
    pub prediction: Arc<PredictionService>,
    pub ingestor: Arc<TelemetryIngestor>,
    pub config: Arc<ApiConfig>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        prediction: Arc<PredictionService>,
        ingestor: Arc<TelemetryIngestor>,
        config: ApiConfig,
    ) -> Self {
        Self {
            prediction,
            ingestor,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }
}
