//! Geographic primitives: bounding boxes, regions, and grid geometry.
//!
//! Grid cells are generated deterministically from (bounding box, N, M):
//! the same inputs always yield the same cell centers, in row-major order
//! from the northwest corner to the southeast corner.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Geographic bounding box in WGS84 degrees.
///
/// `north > south` and `east > west` are required; boxes crossing the
/// antimeridian are not supported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl BoundingBox {
    /// Create a validated bounding box.
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Result<Self, ValidationError> {
        let bbox = Self {
            north,
            south,
            east,
            west,
        };
        bbox.validate()?;
        Ok(bbox)
    }

    /// Build a square box of `n x m` cells around a center point, with the
    /// given cell spacing in degrees.
    pub fn from_center(
        center_lat: f64,
        center_lon: f64,
        spacing_deg: f64,
        grid_n: usize,
        grid_m: usize,
    ) -> Result<Self, ValidationError> {
        if !spacing_deg.is_finite() || spacing_deg <= 0.0 {
            return Err(ValidationError::single(
                "spacing_deg",
                "must be a positive finite number",
            ));
        }
        let half_lat = grid_n as f64 * spacing_deg / 2.0;
        let half_lon = grid_m as f64 * spacing_deg / 2.0;
        Self::new(
            center_lat + half_lat,
            center_lat - half_lat,
            center_lon + half_lon,
            center_lon - half_lon,
        )
    }

    /// Validate ranges and orientation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::empty();
        if !(-90.0..=90.0).contains(&self.north) || !self.north.is_finite() {
            errors.push("north", "latitude must be within [-90, 90]");
        }
        if !(-90.0..=90.0).contains(&self.south) || !self.south.is_finite() {
            errors.push("south", "latitude must be within [-90, 90]");
        }
        if !(-180.0..=180.0).contains(&self.east) || !self.east.is_finite() {
            errors.push("east", "longitude must be within [-180, 180]");
        }
        if !(-180.0..=180.0).contains(&self.west) || !self.west.is_finite() {
            errors.push("west", "longitude must be within [-180, 180]");
        }
        if self.north <= self.south {
            errors.push("north", "must be greater than south");
        }
        if self.east <= self.west {
            errors.push("east", "must be greater than west");
        }
        errors.into_result()
    }

    /// Latitude extent in degrees.
    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }

    /// Longitude extent in degrees.
    pub fn lon_span(&self) -> f64 {
        self.east - self.west
    }

    /// Whether a point falls inside the box (inclusive).
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.south && lat <= self.north && lon >= self.west && lon <= self.east
    }

    /// Deterministic cell centers for an `n x m` grid over this box.
    ///
    /// Centers are evenly spaced, each at the middle of its cell. Ordering
    /// is row-major from northwest to southeast: latitude descending across
    /// rows, longitude ascending within a row. Same inputs always yield the
    /// same sequence.
    pub fn cell_centers(&self, grid_n: usize, grid_m: usize) -> Vec<(f64, f64)> {
        let lat_step = self.lat_span() / grid_n as f64;
        let lon_step = self.lon_span() / grid_m as f64;
        let mut centers = Vec::with_capacity(grid_n * grid_m);
        for i in 0..grid_n {
            let lat = self.north - (i as f64 + 0.5) * lat_step;
            for j in 0..grid_m {
                let lon = self.west + (j as f64 + 0.5) * lon_step;
                centers.push((lat, lon));
            }
        }
        centers
    }
}

/// A named study region: the unit for which covariate rasters are stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Directory-safe region name, e.g. "mayotte".
    pub name: String,
    pub bbox: BoundingBox,
}

impl Region {
    pub fn new(name: impl Into<String>, bbox: BoundingBox) -> Self {
        Self {
            name: name.into(),
            bbox,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
