//! Deterministic simulated suitability surface.

use crate::model::SuitabilityModel;
use pelagos_core::{CellFeatures, Covariate, ModelError, PredictionSource};

/// A smooth synthetic suitability surface for demos and offline work.
///
/// The surface is a gaussian hotspot centered on the study region,
/// modulated by whatever covariates are present and overlaid with a small
/// seeded, coordinate-keyed ripple. Everything is a pure function of
/// (coordinates, covariates, seed): two calls with identical inputs
/// produce identical scores, no hidden randomness.
#[derive(Debug, Clone)]
pub struct SimulatedModel {
    center_lat: f64,
    center_lon: f64,
    /// Hotspot radius in degrees (standard deviation of the gaussian).
    radius_deg: f64,
    seed: u64,
}

impl SimulatedModel {
    pub fn new(center_lat: f64, center_lon: f64) -> Self {
        Self {
            center_lat,
            center_lon,
            radius_deg: 0.15,
            seed: 0,
        }
    }

    /// Override the ripple seed (and thereby the small-scale texture).
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_radius_deg(mut self, radius_deg: f64) -> Self {
        self.radius_deg = radius_deg;
        self
    }

    /// Deterministic pseudo-noise in [0, 1) keyed by coordinates and seed.
    /// FNV-1a over the raw bit patterns; stable across processes.
    fn ripple(&self, lat: f64, lon: f64) -> f64 {
        const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;
        let mut hash = FNV_OFFSET ^ self.seed;
        for byte in lat
            .to_bits()
            .to_le_bytes()
            .into_iter()
            .chain(lon.to_bits().to_le_bytes())
        {
            hash ^= byte as u64;
            hash = hash.wrapping_mul(FNV_PRIME);
        }
        (hash >> 11) as f64 / (1u64 << 53) as f64
    }
}

impl SuitabilityModel for SimulatedModel {
    fn name(&self) -> &'static str {
        "simulated"
    }

    fn source(&self) -> PredictionSource {
        PredictionSource::Simulated
    }

    fn predict(&self, cell: &CellFeatures) -> Result<f64, ModelError> {
        let dlat = (cell.latitude - self.center_lat) / self.radius_deg;
        let dlon = (cell.longitude - self.center_lon) / self.radius_deg;
        let hotspot = (-(dlat * dlat + dlon * dlon) / 2.0).exp();

        // Covariate modulation: productive (chlorophyll-rich) water and
        // temperatures near 26C nudge the score upward.
        let mut modulation = 0.0;
        if let Some(chl) = cell.covariates.get(Covariate::Chlorophyll) {
            modulation += 0.10 * (chl.max(0.0) / (1.0 + chl.max(0.0)));
        }
        if let Some(sst) = cell.covariates.get(Covariate::Sst) {
            let t = (sst - 26.0) / 6.0;
            modulation += 0.10 * (-(t * t)).exp();
        }

        let score = 0.1 + 0.6 * hotspot + modulation + 0.1 * self.ripple(cell.latitude, cell.longitude);
        Ok(score.clamp(0.0, 1.0))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pelagos_core::CovariateVector;
    use proptest::prelude::*;

    fn cell(lat: f64, lon: f64) -> CellFeatures {
        CellFeatures {
            latitude: lat,
            longitude: lon,
            covariates: CovariateVector::new(),
            low_confidence: false,
        }
    }

    #[test]
    fn test_simulated_is_deterministic() {
        let model = SimulatedModel::new(-13.0, 46.23).with_seed(7);
        let a = model.predict(&cell(-13.004, 46.237)).unwrap();
        let b = model.predict(&cell(-13.004, 46.237)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_simulated_hotspot_peaks_at_center() {
        let model = SimulatedModel::new(-13.0, 46.23);
        let center = model.predict(&cell(-13.0, 46.23)).unwrap();
        let edge = model.predict(&cell(-12.6, 45.9)).unwrap();
        assert!(center > edge, "center {center} should beat edge {edge}");
    }

    #[test]
    fn test_seed_changes_texture_not_contract() {
        let a = SimulatedModel::new(-13.0, 46.23).with_seed(1);
        let b = SimulatedModel::new(-13.0, 46.23).with_seed(2);
        let at = a.predict(&cell(-13.1, 46.3)).unwrap();
        let bt = b.predict(&cell(-13.1, 46.3)).unwrap();
        assert_ne!(at, bt);
        assert!((0.0..=1.0).contains(&at));
        assert!((0.0..=1.0).contains(&bt));
    }

    #[test]
    fn test_covariates_modulate_score() {
        let model = SimulatedModel::new(-13.0, 46.23);
        let bare = model.predict(&cell(-13.05, 46.3)).unwrap();
        let mut rich = cell(-13.05, 46.3);
        rich.covariates.set(Covariate::Chlorophyll, 2.0);
        rich.covariates.set(Covariate::Sst, 26.0);
        let fed = model.predict(&rich).unwrap();
        assert!(fed > bare);
    }

    proptest! {
        #[test]
        fn prop_simulated_score_bounded(
            lat in -90.0f64..90.0,
            lon in -180.0f64..180.0,
            seed in any::<u64>()
        ) {
            let model = SimulatedModel::new(-13.0, 46.23).with_seed(seed);
            let score = model.predict(&cell(lat, lon)).unwrap();
            prop_assert!((0.0..=1.0).contains(&score));
            prop_assert!(score.is_finite());
        }
    }
}
