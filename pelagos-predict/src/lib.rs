//! PELAGOS Predict - Suitability Models and Prediction Facade
//!
//! Two predictor implementations behind one trait: a deterministic
//! simulated surface for demos and offline development, and a trained
//! model loaded from a weight artifact. The [`PredictionService`] facade
//! composes raster store, feature assembler, and an ordered predictor
//! chain into a single "get current hotspot grid" operation.

pub mod model;
pub mod service;
pub mod simulated;
pub mod trained;

pub use model::SuitabilityModel;
pub use service::PredictionService;
pub use simulated::SimulatedModel;
pub use trained::{ModelArtifact, TrainedModel};
