//! Runtime configuration types.

use crate::covariate::Covariate;
use crate::geo::{BoundingBox, Region};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Substitution policy for covariates missing at a grid cell.
///
/// The substituted cell is always flagged low-confidence; the policy only
/// decides what value stands in so the output grid stays complete.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "policy", content = "value")]
pub enum MissingValuePolicy {
    /// Substitute zero.
    #[default]
    Zero,
    /// Substitute a fixed constant.
    Constant(f64),
    /// Substitute the mean of the layer's valid cells; falls back to zero
    /// when the whole layer is absent.
    RegionalMean,
}

/// Master runtime configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PelagosConfig {
    /// Root directory holding one subdirectory of covariate layers per region.
    pub data_dir: PathBuf,
    /// Trained model artifact path.
    pub model_path: PathBuf,
    /// Default study region for hotspot requests that omit one.
    pub region: Region,
    /// Default output grid dimensions.
    pub grid_n: usize,
    pub grid_m: usize,
    /// Layers that must load for the region (load fails without them).
    pub required_covariates: Vec<Covariate>,
    /// Layers that may be absent (cells fall back to the missing-value policy).
    pub optional_covariates: Vec<Covariate>,
    pub missing_value_policy: MissingValuePolicy,
}

impl PelagosConfig {
    /// Default grid dimension (40x40).
    pub const DEFAULT_GRID: usize = 40;

    /// Default cell spacing in degrees.
    pub const DEFAULT_SPACING_DEG: f64 = 0.02;

    /// The default study region off Mayotte, matching the satellite export
    /// coverage: a 40x40 grid at 0.02 degree spacing centered on
    /// (-13.00, 46.23).
    pub fn default_region() -> Region {
        let bbox = BoundingBox::from_center(
            -13.00,
            46.23,
            Self::DEFAULT_SPACING_DEG,
            Self::DEFAULT_GRID,
            Self::DEFAULT_GRID,
        )
        .expect("default region constants are valid");
        Region::new("mayotte", bbox)
    }
}

impl Default for PelagosConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            model_path: PathBuf::from("data/habitat_model.json"),
            region: Self::default_region(),
            grid_n: Self::DEFAULT_GRID,
            grid_m: Self::DEFAULT_GRID,
            required_covariates: vec![Covariate::Sst, Covariate::Chlorophyll],
            optional_covariates: vec![Covariate::Salinity],
            missing_value_policy: MissingValuePolicy::Zero,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_region_covers_center() {
        let region = PelagosConfig::default_region();
        assert_eq!(region.name, "mayotte");
        assert!(region.bbox.contains(-13.00, 46.23));
        assert!((region.bbox.lat_span() - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_default_config_covariate_split() {
        let config = PelagosConfig::default();
        assert!(config.required_covariates.contains(&Covariate::Sst));
        assert!(config.optional_covariates.contains(&Covariate::Salinity));
        assert_eq!(config.missing_value_policy, MissingValuePolicy::Zero);
    }

    #[test]
    fn test_missing_value_policy_serde_round_trip() {
        let policy = MissingValuePolicy::Constant(0.5);
        let json = serde_json::to_string(&policy).unwrap();
        let back: MissingValuePolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(policy, back);
    }
}
