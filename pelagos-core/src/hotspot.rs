//! Suitability grid types: cells, prediction sources, and hotspot results.

use crate::covariate::CovariateVector;
use crate::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Assembled per-cell features, ready for a suitability model.
///
/// Produced by the feature assembler: every configured covariate has a
/// value (substituted where the raster was missing) and `low_confidence`
/// records whether any substitution happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellFeatures {
    pub latitude: f64,
    pub longitude: f64,
    pub covariates: CovariateVector,
    pub low_confidence: bool,
}

/// One discretized spatial unit of the output suitability map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    pub latitude: f64,
    pub longitude: f64,
    pub covariates: CovariateVector,
    /// Bounded suitability score in [0, 1]; `None` before prediction.
    pub suitability: Option<f64>,
    /// Set when missing covariates were substituted for this cell.
    pub low_confidence: bool,
}

impl GridCell {
    /// Score a cell's features, clamping into [0, 1].
    pub fn from_features(features: CellFeatures, score: f64) -> Self {
        Self {
            latitude: features.latitude,
            longitude: features.longitude,
            covariates: features.covariates,
            suitability: Some(score.clamp(0.0, 1.0)),
            low_confidence: features.low_confidence,
        }
    }
}

/// Which predictor produced a hotspot grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PredictionSource {
    #[serde(rename = "simulated")]
    Simulated,
    #[serde(rename = "real-model")]
    RealModel,
}

impl PredictionSource {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PredictionSource::Simulated => "simulated",
            PredictionSource::RealModel => "real-model",
        }
    }
}

impl fmt::Display for PredictionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested prediction mode for a hotspot grid.
///
/// `Auto` consults the facade's ordered predictor chain (simulated first,
/// then the real model); the explicit modes pin a single predictor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionMode {
    #[default]
    Auto,
    Simulated,
    Real,
}

impl FromStr for PredictionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(PredictionMode::Auto),
            "simulated" => Ok(PredictionMode::Simulated),
            "real" => Ok(PredictionMode::Real),
            other => Err(format!("unknown prediction mode: {other}")),
        }
    }
}

/// A complete scored grid, computed on demand.
///
/// Not the canonical record: the covariate rasters and the model are.
/// Either all `grid_n * grid_m` cells are present or the computation failed
/// as a whole; partial grids are never constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotspotResult {
    pub generated_at: Timestamp,
    pub source: PredictionSource,
    pub grid_n: usize,
    pub grid_m: usize,
    pub cells: Vec<GridCell>,
}

impl HotspotResult {
    /// Expected number of cells.
    pub fn expected_len(&self) -> usize {
        self.grid_n * self.grid_m
    }

    /// Whether the grid is complete (it always should be).
    pub fn is_complete(&self) -> bool {
        self.cells.len() == self.expected_len()
            && self.cells.iter().all(|c| c.suitability.is_some())
    }
}

// ============================================================================
// TESTS
// ============================================================================
