//! The prediction facade: raster store -> assembler -> predictor chain.

use crate::model::SuitabilityModel;
use crate::simulated::SimulatedModel;
use crate::trained::TrainedModel;
use chrono::Utc;
use pelagos_core::{
    GridCell, HotspotResult, PredictionError, PredictionMode, PredictionSource, Region,
};
use pelagos_raster::FeatureAssembler;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    region: String,
    grid_n: usize,
    grid_m: usize,
    mode: PredictionMode,
}

/// Orchestrates a complete hotspot grid computation.
///
/// The fallback policy is an explicit ordered capability list rather than
/// implicit control flow: for a given mode the facade walks its predictor
/// chain in order and takes the first predictor that succeeds. `Auto`
/// consults the whole chain (simulated first, then the real model);
/// explicit modes restrict the chain to matching predictors. When every
/// candidate fails the caller gets `PredictionError::Unavailable` - never
/// a partial grid.
///
/// Completed grids are cached per (region, dimensions, mode) for the
/// service's lifetime; rasters are immutable after load, so the cache only
/// needs explicit invalidation.
pub struct PredictionService {
    assembler: FeatureAssembler,
    predictors: Vec<Arc<dyn SuitabilityModel>>,
    cache: Mutex<HashMap<CacheKey, HotspotResult>>,
}

impl PredictionService {
    /// Create a facade over an assembler and an ordered predictor chain.
    pub fn new(assembler: FeatureAssembler, predictors: Vec<Arc<dyn SuitabilityModel>>) -> Self {
        Self {
            assembler,
            predictors,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// The standard chain: a simulated surface centered on the study
    /// region, falling back to the trained artifact at `model_path`.
    pub fn standard(assembler: FeatureAssembler, model_path: &Path) -> Self {
        let bbox = assembler.store().region().bbox;
        let center_lat = (bbox.north + bbox.south) / 2.0;
        let center_lon = (bbox.east + bbox.west) / 2.0;
        let simulated = Arc::new(SimulatedModel::new(center_lat, center_lon));
        let trained = Arc::new(TrainedModel::new(model_path));
        Self::new(assembler, vec![simulated, trained])
    }

    pub fn region(&self) -> &Region {
        self.assembler.store().region()
    }

    /// Covariates with a loaded raster layer, for health reporting.
    pub fn loaded_covariates(&self) -> Vec<pelagos_core::Covariate> {
        self.assembler.store().loaded_covariates()
    }

    /// Compute (or return the cached) hotspot grid.
    ///
    /// Requires `grid_n >= 1` and `grid_m >= 1`; the boundary layer
    /// validates request parameters before calling in.
    pub fn get_hotspots(
        &self,
        grid_n: usize,
        grid_m: usize,
        mode: PredictionMode,
    ) -> Result<HotspotResult, PredictionError> {
        let key = CacheKey {
            region: self.region().name.clone(),
            grid_n,
            grid_m,
            mode,
        };
        if let Some(cached) = self.cache_get(&key) {
            tracing::debug!(region = %key.region, grid_n, grid_m, ?mode, "Hotspot cache hit");
            return Ok(cached);
        }

        let chain = self.chain_for(mode);
        let mut attempts = Vec::new();
        if chain.is_empty() {
            attempts.push(format!("no predictor registered for mode {mode:?}"));
        }

        let bbox = self.region().bbox;
        let features = self.assembler.assemble(&bbox, grid_n, grid_m);

        for predictor in chain {
            match predictor.predict_grid(&features) {
                Ok(scores) => {
                    let mut cells: Vec<GridCell> = features
                        .iter()
                        .cloned()
                        .zip(scores)
                        .map(|(cell, score)| GridCell::from_features(cell, score))
                        .collect();
                    // Row-major generation already yields this order; the
                    // sort pins the contract: latitude descending, then
                    // longitude ascending.
                    cells.sort_by(|a, b| {
                        b.latitude
                            .total_cmp(&a.latitude)
                            .then(a.longitude.total_cmp(&b.longitude))
                    });
                    let result = HotspotResult {
                        generated_at: Utc::now(),
                        source: predictor.source(),
                        grid_n,
                        grid_m,
                        cells,
                    };
                    tracing::info!(
                        predictor = predictor.name(),
                        cells = result.cells.len(),
                        "Hotspot grid computed"
                    );
                    self.cache_put(key, result.clone());
                    return Ok(result);
                }
                Err(err) => {
                    tracing::warn!(
                        predictor = predictor.name(),
                        error = %err,
                        "Predictor failed, consulting next in chain"
                    );
                    attempts.push(format!("{}: {}", predictor.name(), err));
                }
            }
        }

        Err(PredictionError::Unavailable { attempts })
    }

    /// Drop all cached grids (after replacing raster exports or artifacts).
    pub fn clear_cache(&self) {
        self.cache_lock().clear();
    }

    fn chain_for(&self, mode: PredictionMode) -> Vec<Arc<dyn SuitabilityModel>> {
        let wanted = |source: PredictionSource| match mode {
            PredictionMode::Auto => true,
            PredictionMode::Simulated => source == PredictionSource::Simulated,
            PredictionMode::Real => source == PredictionSource::RealModel,
        };
        self.predictors
            .iter()
            .filter(|p| wanted(p.source()))
            .cloned()
            .collect()
    }

    fn cache_get(&self, key: &CacheKey) -> Option<HotspotResult> {
        self.cache_lock().get(key).cloned()
    }

    fn cache_put(&self, key: CacheKey, result: HotspotResult) {
        self.cache_lock().insert(key, result);
    }

    fn cache_lock(&self) -> std::sync::MutexGuard<'_, HashMap<CacheKey, HotspotResult>> {
        // The cache is advisory; a poisoned lock just means a panicked
        // writer, whose partial state a HashMap cannot expose.
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trained::ModelArtifact;
    use pelagos_core::{
        BoundingBox, CellFeatures, Covariate, MissingValuePolicy, ModelError, RasterError,
    };
    use pelagos_raster::{RasterLayer, RasterStore};
    use std::io::Write;

    fn bbox() -> BoundingBox {
        BoundingBox::new(-12.6, -13.4, 46.63, 45.83).unwrap()
    }

    fn region() -> Region {
        Region::new("testbed", bbox())
    }

    fn store_with_layers() -> Arc<RasterStore> {
        let sst = RasterLayer {
            covariate: Covariate::Sst,
            bbox: bbox(),
            rows: 8,
            cols: 8,
            nodata: None,
            values: vec![26.0; 64],
        };
        let chl = RasterLayer {
            covariate: Covariate::Chlorophyll,
            bbox: bbox(),
            rows: 8,
            cols: 8,
            nodata: None,
            values: vec![0.4; 64],
        };
        Arc::new(RasterStore::from_layers(region(), vec![sst, chl]).unwrap())
    }

    fn assembler(store: Arc<RasterStore>) -> FeatureAssembler {
        FeatureAssembler::new(
            store,
            vec![Covariate::Sst, Covariate::Chlorophyll, Covariate::Salinity],
            MissingValuePolicy::Zero,
        )
    }

    fn write_artifact() -> tempfile::NamedTempFile {
        let artifact = ModelArtifact {
            name: "habitat-lr-v1".to_string(),
            features: vec![Covariate::Chlorophyll, Covariate::Sst],
            weights: vec![1.2, 0.08],
            bias: -2.5,
        };
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&artifact).unwrap().as_bytes())
            .unwrap();
        file
    }

    /// Predictor that always fails, for exercising the fallback chain.
    struct FailingModel(PredictionSource);

    impl SuitabilityModel for FailingModel {
        fn name(&self) -> &'static str {
            "failing"
        }
        fn source(&self) -> PredictionSource {
            self.0
        }
        fn predict(&self, _cell: &CellFeatures) -> Result<f64, ModelError> {
            Err(ModelError::ModelUnavailable {
                path: "nowhere".to_string(),
                reason: "synthetic failure".to_string(),
            })
        }
    }

    fn simulated_only_service() -> PredictionService {
        let store = store_with_layers();
        PredictionService::new(
            assembler(store),
            vec![Arc::new(SimulatedModel::new(-13.0, 46.23))],
        )
    }

    #[test]
    fn test_get_hotspots_complete_bounded_grid() {
        let service = simulated_only_service();
        let result = service
            .get_hotspots(40, 40, PredictionMode::Simulated)
            .unwrap();
        assert_eq!(result.cells.len(), 1600);
        assert!(result.is_complete());
        for cell in &result.cells {
            let score = cell.suitability.unwrap();
            assert!((0.0..=1.0).contains(&score));
        }
    }

    #[test]
    fn test_get_hotspots_deterministic_ordering() {
        let service = simulated_only_service();
        let a = service
            .get_hotspots(10, 10, PredictionMode::Simulated)
            .unwrap();
        service.clear_cache();
        let b = service
            .get_hotspots(10, 10, PredictionMode::Simulated)
            .unwrap();
        assert_eq!(a.cells, b.cells);
        for pair in a.cells.windows(2) {
            assert!(
                pair[1].latitude < pair[0].latitude
                    || (pair[1].latitude == pair[0].latitude
                        && pair[1].longitude > pair[0].longitude)
            );
        }
    }

    #[test]
    fn test_real_mode_without_artifact_is_unavailable() {
        let store = store_with_layers();
        let service =
            PredictionService::standard(assembler(store), Path::new("/nonexistent/model.json"));
        let err = service.get_hotspots(5, 5, PredictionMode::Real).unwrap_err();
        let PredictionError::Unavailable { attempts } = err;
        assert_eq!(attempts.len(), 1);
        assert!(attempts[0].contains("real-model"));
    }

    #[test]
    fn test_auto_mode_falls_back_to_real_model() {
        let store = store_with_layers();
        let file = write_artifact();
        let service = PredictionService::new(
            assembler(store),
            vec![
                Arc::new(FailingModel(PredictionSource::Simulated)),
                Arc::new(TrainedModel::new(file.path())),
            ],
        );
        let result = service.get_hotspots(5, 5, PredictionMode::Auto).unwrap();
        assert_eq!(result.source, PredictionSource::RealModel);
        assert!(result.is_complete());
    }

    #[test]
    fn test_auto_mode_exhausted_chain_reports_all_attempts() {
        let store = store_with_layers();
        let service = PredictionService::new(
            assembler(store),
            vec![
                Arc::new(FailingModel(PredictionSource::Simulated)),
                Arc::new(FailingModel(PredictionSource::RealModel)),
            ],
        );
        let err = service.get_hotspots(5, 5, PredictionMode::Auto).unwrap_err();
        let PredictionError::Unavailable { attempts } = err;
        assert_eq!(attempts.len(), 2);
    }

    #[test]
    fn test_missing_optional_layer_flags_low_confidence() {
        // Salinity never loaded: grid is still complete, every cell flagged.
        let service = simulated_only_service();
        let result = service
            .get_hotspots(6, 6, PredictionMode::Simulated)
            .unwrap();
        assert_eq!(result.cells.len(), 36);
        assert!(result.cells.iter().all(|c| c.low_confidence));
    }

    #[test]
    fn test_cache_hit_returns_same_result() {
        let service = simulated_only_service();
        let a = service.get_hotspots(8, 8, PredictionMode::Auto).unwrap();
        let b = service.get_hotspots(8, 8, PredictionMode::Auto).unwrap();
        // Identical including generated_at: the second call was served
        // from cache.
        assert_eq!(a, b);
    }

    #[test]
    fn test_clear_cache_recomputes() {
        let service = simulated_only_service();
        let a = service.get_hotspots(8, 8, PredictionMode::Auto).unwrap();
        service.clear_cache();
        let b = service.get_hotspots(8, 8, PredictionMode::Auto).unwrap();
        // Same cells (deterministic) but a fresh computation timestamp.
        assert_eq!(a.cells, b.cells);
        assert!(b.generated_at >= a.generated_at);
    }

    #[test]
    fn test_mislabeled_region_store_fails_loudly() {
        // RasterStore::load failures surface before the facade exists;
        // ensure the error carries the taxonomy type the boundary expects.
        let dir = tempfile::tempdir().unwrap();
        let err = RasterStore::load(dir.path(), region(), &[Covariate::Sst], &[]).unwrap_err();
        assert!(matches!(err, RasterError::DataUnavailable { .. }));
    }
}
