//! A single georeferenced covariate grid.

use pelagos_core::{BoundingBox, Covariate, RasterError};
use serde::{Deserialize, Serialize};

/// One covariate rasterized over a region: a row-major value grid with
/// geographic bounds and an optional nodata marker.
///
/// Rows run north to south, columns west to east (the usual satellite
/// export orientation). Values equal to `nodata`, or non-finite values,
/// sample as missing rather than as numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterLayer {
    pub covariate: Covariate,
    pub bbox: BoundingBox,
    pub rows: usize,
    pub cols: usize,
    #[serde(default)]
    pub nodata: Option<f64>,
    pub values: Vec<f64>,
}

impl RasterLayer {
    /// Check internal consistency after deserialization.
    pub fn validate(&self) -> Result<(), RasterError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(RasterError::InvalidLayer {
                covariate: self.covariate,
                reason: "grid dimensions must be non-zero".to_string(),
            });
        }
        if self.values.len() != self.rows * self.cols {
            return Err(RasterError::InvalidLayer {
                covariate: self.covariate,
                reason: format!(
                    "expected {} values for a {}x{} grid, got {}",
                    self.rows * self.cols,
                    self.rows,
                    self.cols,
                    self.values.len()
                ),
            });
        }
        if self.bbox.validate().is_err() {
            return Err(RasterError::InvalidLayer {
                covariate: self.covariate,
                reason: "invalid bounding box".to_string(),
            });
        }
        Ok(())
    }

    /// Nearest-cell sample at a coordinate.
    ///
    /// Returns `None` outside the layer's coverage or on a nodata cell;
    /// a coordinate falling off one layer must not abort a whole grid.
    pub fn sample(&self, lat: f64, lon: f64) -> Option<f64> {
        // Guard against a hand-built layer that skipped `validate`.
        if self.rows == 0 || self.cols == 0 || self.values.len() != self.rows * self.cols {
            return None;
        }
        if !self.bbox.contains(lat, lon) {
            return None;
        }
        // Fractional position from the northwest corner, clamped so the
        // box edges still land on the outermost cells.
        let row_f = (self.bbox.north - lat) / self.bbox.lat_span() * self.rows as f64;
        let col_f = (lon - self.bbox.west) / self.bbox.lon_span() * self.cols as f64;
        let row = (row_f as usize).min(self.rows - 1);
        let col = (col_f as usize).min(self.cols - 1);
        let value = self.values[row * self.cols + col];
        if !value.is_finite() {
            return None;
        }
        if let Some(nodata) = self.nodata {
            if value == nodata {
                return None;
            }
        }
        Some(value)
    }

    /// Mean of the layer's valid cells; `None` when every cell is nodata.
    pub fn regional_mean(&self) -> Option<f64> {
        let mut sum = 0.0;
        let mut count = 0usize;
        for &value in &self.values {
            if !value.is_finite() {
                continue;
            }
            if let Some(nodata) = self.nodata {
                if value == nodata {
                    continue;
                }
            }
            sum += value;
            count += 1;
        }
        if count == 0 {
            None
        } else {
            Some(sum / count as f64)
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
