//! Region-scoped collection of covariate layers.

use crate::layer::RasterLayer;
use pelagos_core::{Covariate, CovariateVector, RasterError, Region};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Loaded covariate layers for one region.
///
/// Loading happens once; afterwards the store is read-only and can be
/// shared (behind an `Arc`) across concurrent grid computations.
#[derive(Debug, Clone)]
pub struct RasterStore {
    region: Region,
    layers: HashMap<Covariate, RasterLayer>,
}

impl RasterStore {
    /// Load covariate layers for a region from `<data_dir>/<region>/<covariate>.json`.
    ///
    /// A missing or unparsable *required* layer fails the load with
    /// `DataUnavailable`. Optional layers that cannot be loaded are skipped
    /// with a warning; affected cells will later fall back to the
    /// assembler's missing-value policy.
    pub fn load(
        data_dir: &Path,
        region: Region,
        required: &[Covariate],
        optional: &[Covariate],
    ) -> Result<Self, RasterError> {
        let mut layers = HashMap::new();

        for &covariate in required {
            let path = Self::layer_path(data_dir, &region, covariate);
            let layer = Self::load_layer(&path, covariate)?;
            tracing::info!(%covariate, path = %path.display(), "Loaded required covariate layer");
            layers.insert(covariate, layer);
        }

        for &covariate in optional {
            let path = Self::layer_path(data_dir, &region, covariate);
            match Self::load_layer(&path, covariate) {
                Ok(layer) => {
                    tracing::info!(%covariate, path = %path.display(), "Loaded optional covariate layer");
                    layers.insert(covariate, layer);
                }
                Err(err) => {
                    tracing::warn!(%covariate, error = %err, "Optional covariate layer unavailable, cells will use the missing-value policy");
                }
            }
        }

        Ok(Self { region, layers })
    }

    /// Build a store directly from layers (tests, synthetic regions).
    pub fn from_layers(region: Region, layers: Vec<RasterLayer>) -> Result<Self, RasterError> {
        let mut map = HashMap::new();
        for layer in layers {
            layer.validate()?;
            map.insert(layer.covariate, layer);
        }
        Ok(Self {
            region,
            layers: map,
        })
    }

    /// An empty store: every sample comes back fully missing. Used for
    /// simulated-only operation where no satellite exports exist yet.
    pub fn empty(region: Region) -> Self {
        Self {
            region,
            layers: HashMap::new(),
        }
    }

    fn layer_path(data_dir: &Path, region: &Region, covariate: Covariate) -> PathBuf {
        data_dir
            .join(&region.name)
            .join(format!("{}.json", covariate.as_str()))
    }

    fn load_layer(path: &Path, covariate: Covariate) -> Result<RasterLayer, RasterError> {
        let text = std::fs::read_to_string(path).map_err(|e| RasterError::DataUnavailable {
            covariate,
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let layer: RasterLayer =
            serde_json::from_str(&text).map_err(|e| RasterError::DataUnavailable {
                covariate,
                path: path.display().to_string(),
                reason: format!("parse error: {e}"),
            })?;
        if layer.covariate != covariate {
            return Err(RasterError::InvalidLayer {
                covariate,
                reason: format!("file declares covariate {}", layer.covariate),
            });
        }
        layer.validate()?;
        Ok(layer)
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Covariates with a loaded layer.
    pub fn loaded_covariates(&self) -> Vec<Covariate> {
        let mut loaded: Vec<Covariate> = self.layers.keys().copied().collect();
        loaded.sort();
        loaded
    }

    pub fn layer(&self, covariate: Covariate) -> Option<&RasterLayer> {
        self.layers.get(&covariate)
    }

    /// Sample every loaded layer at a coordinate.
    ///
    /// Covariates whose layer is absent, out of coverage, or nodata at the
    /// point are simply missing from the returned vector.
    pub fn sample(&self, lat: f64, lon: f64) -> CovariateVector {
        let mut vector = CovariateVector::new();
        for (covariate, layer) in &self.layers {
            if let Some(value) = layer.sample(lat, lon) {
                vector.set(*covariate, value);
            }
        }
        vector
    }
}

// ============================================================================
// TESTS
// ============================================================================
