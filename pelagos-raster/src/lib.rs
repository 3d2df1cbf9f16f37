//! PELAGOS Raster - Covariate Rasters and Feature Assembly
//!
//! Loads gridded environmental covariate layers (SST, chlorophyll,
//! salinity) for a study region and resolves per-cell covariate vectors
//! for the output suitability grid. Loaded raster data is read-only and
//! may be shared across concurrent grid computations without locking.

pub mod assembler;
pub mod layer;
pub mod store;

pub use assembler::FeatureAssembler;
pub use layer::RasterLayer;
pub use store::RasterStore;
