//! The suitability model capability.

use pelagos_core::{CellFeatures, ModelError, PredictionSource};

/// A predictor scoring assembled cell features with a bounded suitability
/// score.
///
/// Implementations must clamp scores into [0, 1] and must never return
/// NaN; the assembler guarantees feature inputs are already NaN-free.
/// Models raise typed failures rather than silently returning defaults -
/// the facade decides what a failure means.
pub trait SuitabilityModel: Send + Sync {
    /// Short identifier used in logs and fallback diagnostics.
    fn name(&self) -> &'static str;

    /// Which result source this predictor produces.
    fn source(&self) -> PredictionSource;

    /// Score a single cell.
    fn predict(&self, cell: &CellFeatures) -> Result<f64, ModelError>;

    /// Score a whole grid. The default scores cell by cell; implementations
    /// with per-call setup cost (artifact loading) override this.
    fn predict_grid(&self, cells: &[CellFeatures]) -> Result<Vec<f64>, ModelError> {
        cells.iter().map(|cell| self.predict(cell)).collect()
    }
}
