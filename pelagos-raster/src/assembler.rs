//! Feature assembly: one covariate vector per output grid cell.

use crate::store::RasterStore;
use pelagos_core::{BoundingBox, CellFeatures, Covariate, MissingValuePolicy};
use std::sync::Arc;

/// Resolves the covariate vector at each cell of the output grid.
///
/// The assembler guarantees a *complete* grid: every requested covariate
/// gets a value in every cell. Where the raster store has nothing for a
/// coordinate, the configured [`MissingValuePolicy`] substitutes a value
/// and the cell is flagged low-confidence instead of being dropped. This
/// also guarantees no NaN ever reaches a predictor.
#[derive(Debug, Clone)]
pub struct FeatureAssembler {
    store: Arc<RasterStore>,
    covariates: Vec<Covariate>,
    policy: MissingValuePolicy,
}

impl FeatureAssembler {
    /// Create an assembler over a loaded store.
    ///
    /// `covariates` is the full feature set (required + optional), in the
    /// order models expect it.
    pub fn new(
        store: Arc<RasterStore>,
        covariates: Vec<Covariate>,
        policy: MissingValuePolicy,
    ) -> Self {
        Self {
            store,
            covariates,
            policy,
        }
    }

    pub fn store(&self) -> &Arc<RasterStore> {
        &self.store
    }

    pub fn covariates(&self) -> &[Covariate] {
        &self.covariates
    }

    /// Assemble features for an `n x m` grid over the bounding box.
    ///
    /// Returns exactly `grid_n * grid_m` cells in row-major order from
    /// northwest to southeast, deterministically for identical inputs.
    pub fn assemble(
        &self,
        bbox: &BoundingBox,
        grid_n: usize,
        grid_m: usize,
    ) -> Vec<CellFeatures> {
        let mut cells = Vec::with_capacity(grid_n * grid_m);
        let mut substituted = 0usize;

        for (lat, lon) in bbox.cell_centers(grid_n, grid_m) {
            let mut covariates = self.store.sample(lat, lon);
            let missing = covariates.missing_of(&self.covariates);
            let low_confidence = !missing.is_empty();
            for covariate in missing {
                covariates.set(covariate, self.substitute(covariate));
                substituted += 1;
            }
            cells.push(CellFeatures {
                latitude: lat,
                longitude: lon,
                covariates,
                low_confidence,
            });
        }

        if substituted > 0 {
            tracing::debug!(
                cells = cells.len(),
                substituted,
                "Substituted missing covariate samples during assembly"
            );
        }
        cells
    }

    fn substitute(&self, covariate: Covariate) -> f64 {
        match self.policy {
            MissingValuePolicy::Zero => 0.0,
            MissingValuePolicy::Constant(value) => value,
            MissingValuePolicy::RegionalMean => self
                .store
                .layer(covariate)
                .and_then(|layer| layer.regional_mean())
                .unwrap_or(0.0),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::RasterLayer;
    use pelagos_core::Region;

    fn bbox() -> BoundingBox {
        BoundingBox::new(-12.0, -14.0, 47.0, 45.0).unwrap()
    }

    fn store_with_sst_only() -> Arc<RasterStore> {
        let layer = RasterLayer {
            covariate: Covariate::Sst,
            bbox: bbox(),
            rows: 4,
            cols: 4,
            nodata: Some(-9999.0),
            values: vec![
                26.0, 26.0, 26.0, 26.0, //
                26.0, 26.0, 26.0, 26.0, //
                24.0, 24.0, -9999.0, 24.0, //
                24.0, 24.0, 24.0, 24.0,
            ],
        };
        Arc::new(RasterStore::from_layers(Region::new("testbed", bbox()), vec![layer]).unwrap())
    }

    fn full_feature_set() -> Vec<Covariate> {
        vec![Covariate::Sst, Covariate::Chlorophyll, Covariate::Salinity]
    }

    #[test]
    fn test_assemble_exact_cell_count() {
        let assembler = FeatureAssembler::new(
            store_with_sst_only(),
            full_feature_set(),
            MissingValuePolicy::Zero,
        );
        let cells = assembler.assemble(&bbox(), 6, 5);
        assert_eq!(cells.len(), 30);
    }

    #[test]
    fn test_assemble_substitutes_and_flags_missing_layer() {
        // Chlorophyll and salinity layers are entirely absent: every cell
        // still materializes, flagged low-confidence.
        let assembler = FeatureAssembler::new(
            store_with_sst_only(),
            full_feature_set(),
            MissingValuePolicy::Constant(0.25),
        );
        let cells = assembler.assemble(&bbox(), 4, 4);
        for cell in &cells {
            assert!(cell.low_confidence);
            assert_eq!(cell.covariates.get(Covariate::Chlorophyll), Some(0.25));
            assert_eq!(cell.covariates.get(Covariate::Salinity), Some(0.25));
            assert!(cell.covariates.get(Covariate::Sst).is_some());
        }
    }

    #[test]
    fn test_assemble_nodata_cell_uses_regional_mean() {
        let assembler = FeatureAssembler::new(
            store_with_sst_only(),
            vec![Covariate::Sst],
            MissingValuePolicy::RegionalMean,
        );
        let cells = assembler.assemble(&bbox(), 4, 4);
        let flagged: Vec<&CellFeatures> = cells.iter().filter(|c| c.low_confidence).collect();
        assert_eq!(flagged.len(), 1);
        // Mean of the 15 valid cells: (8*26 + 7*24) / 15.
        let expected = (8.0 * 26.0 + 7.0 * 24.0) / 15.0;
        let got = flagged[0].covariates.get(Covariate::Sst).unwrap();
        assert!((got - expected).abs() < 1e-9);
    }

    #[test]
    fn test_assemble_full_coverage_no_flags() {
        let assembler = FeatureAssembler::new(
            store_with_sst_only(),
            vec![Covariate::Sst],
            MissingValuePolicy::Zero,
        );
        // 2x2 grid centers all land in valid quadrants of the 4x4 raster.
        let cells = assembler.assemble(&bbox(), 2, 2);
        assert!(cells.iter().all(|c| !c.low_confidence));
    }

    #[test]
    fn test_assemble_deterministic() {
        let assembler = FeatureAssembler::new(
            store_with_sst_only(),
            full_feature_set(),
            MissingValuePolicy::Zero,
        );
        let a = assembler.assemble(&bbox(), 5, 5);
        let b = assembler.assemble(&bbox(), 5, 5);
        assert_eq!(a, b);
    }
}
