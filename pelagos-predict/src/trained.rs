//! Trained suitability model loaded from a weight artifact.

use crate::model::SuitabilityModel;
use pelagos_core::{CellFeatures, Covariate, ModelError, PredictionSource};
use std::path::{Path, PathBuf};

/// Serialized model artifact: a logistic scorer over named covariates.
///
/// The artifact declares its own feature order; predictions assemble the
/// input vector in exactly that order, so a retrained model can reorder or
/// drop covariates without code changes.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ModelArtifact {
    pub name: String,
    pub features: Vec<Covariate>,
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl ModelArtifact {
    /// Check the artifact's internal shape.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.features.is_empty() {
            return Err(ModelError::InferenceError {
                reason: "artifact declares no features".to_string(),
            });
        }
        if self.features.len() != self.weights.len() {
            return Err(ModelError::InferenceError {
                reason: format!(
                    "artifact declares {} feature(s) but {} weight(s)",
                    self.features.len(),
                    self.weights.len()
                ),
            });
        }
        if !self.bias.is_finite() || self.weights.iter().any(|w| !w.is_finite()) {
            return Err(ModelError::InferenceError {
                reason: "artifact contains non-finite weights".to_string(),
            });
        }
        Ok(())
    }

    fn score(&self, cell: &CellFeatures) -> Result<f64, ModelError> {
        let mut z = self.bias;
        for (covariate, weight) in self.features.iter().zip(&self.weights) {
            let value = cell.covariates.get(*covariate).ok_or_else(|| {
                // Should never happen: the assembler substitutes missing
                // covariates before anything reaches a predictor.
                ModelError::InferenceError {
                    reason: format!("feature vector missing {covariate}"),
                }
            })?;
            z += weight * value;
        }
        let score = 1.0 / (1.0 + (-z).exp());
        Ok(score.clamp(0.0, 1.0))
    }
}

/// A trained model backed by a JSON artifact on disk.
///
/// The artifact is read per prediction call and not cached here: completed
/// grids are cached by the facade, and re-reading keeps a freshly exported
/// artifact live without a restart.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    path: PathBuf,
}

impl TrainedModel {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load and validate the artifact.
    ///
    /// Missing or unparsable files are `ModelUnavailable` (triggering
    /// facade fallback); a structurally broken artifact that parsed is an
    /// `InferenceError` from `validate`.
    pub fn load_artifact(&self) -> Result<ModelArtifact, ModelError> {
        let text =
            std::fs::read_to_string(&self.path).map_err(|e| ModelError::ModelUnavailable {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            })?;
        let artifact: ModelArtifact =
            serde_json::from_str(&text).map_err(|e| ModelError::ModelUnavailable {
                path: self.path.display().to_string(),
                reason: format!("parse error: {e}"),
            })?;
        artifact.validate()?;
        tracing::debug!(
            model = %artifact.name,
            features = artifact.features.len(),
            "Loaded model artifact"
        );
        Ok(artifact)
    }
}

impl SuitabilityModel for TrainedModel {
    fn name(&self) -> &'static str {
        "real-model"
    }

    fn source(&self) -> PredictionSource {
        PredictionSource::RealModel
    }

    fn predict(&self, cell: &CellFeatures) -> Result<f64, ModelError> {
        self.load_artifact()?.score(cell)
    }

    fn predict_grid(&self, cells: &[CellFeatures]) -> Result<Vec<f64>, ModelError> {
        let artifact = self.load_artifact()?;
        cells.iter().map(|cell| artifact.score(cell)).collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pelagos_core::CovariateVector;
    use std::io::Write;

    fn artifact() -> ModelArtifact {
        ModelArtifact {
            name: "habitat-lr-v1".to_string(),
            features: vec![Covariate::Chlorophyll, Covariate::Sst],
            weights: vec![1.2, 0.08],
            bias: -2.5,
        }
    }

    fn cell_with(chl: f64, sst: f64) -> CellFeatures {
        let mut covariates = CovariateVector::new();
        covariates.set(Covariate::Chlorophyll, chl);
        covariates.set(Covariate::Sst, sst);
        CellFeatures {
            latitude: -13.0,
            longitude: 46.2,
            covariates,
            low_confidence: false,
        }
    }

    fn write_artifact(artifact: &ModelArtifact) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(artifact).unwrap().as_bytes())
            .unwrap();
        file
    }

    #[test]
    fn test_artifact_validate_arity_mismatch() {
        let mut bad = artifact();
        bad.weights.pop();
        let err = bad.validate().unwrap_err();
        assert!(matches!(err, ModelError::InferenceError { .. }));
    }

    #[test]
    fn test_missing_artifact_is_model_unavailable() {
        let model = TrainedModel::new("/nonexistent/habitat_model.json");
        let err = model.predict(&cell_with(0.5, 26.0)).unwrap_err();
        assert!(matches!(err, ModelError::ModelUnavailable { .. }));
    }

    #[test]
    fn test_corrupt_artifact_is_model_unavailable() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ definitely not a model").unwrap();
        let model = TrainedModel::new(file.path());
        let err = model.predict(&cell_with(0.5, 26.0)).unwrap_err();
        assert!(matches!(err, ModelError::ModelUnavailable { .. }));
    }

    #[test]
    fn test_predict_scores_in_unit_interval() {
        let file = write_artifact(&artifact());
        let model = TrainedModel::new(file.path());
        let lean = model.predict(&cell_with(0.05, 20.0)).unwrap();
        let rich = model.predict(&cell_with(3.0, 27.0)).unwrap();
        assert!((0.0..=1.0).contains(&lean));
        assert!((0.0..=1.0).contains(&rich));
        assert!(rich > lean);
    }

    #[test]
    fn test_predict_missing_feature_is_inference_error() {
        let file = write_artifact(&artifact());
        let model = TrainedModel::new(file.path());
        let empty = CellFeatures {
            latitude: -13.0,
            longitude: 46.2,
            covariates: CovariateVector::new(),
            low_confidence: true,
        };
        let err = model.predict(&empty).unwrap_err();
        assert!(matches!(err, ModelError::InferenceError { .. }));
    }

    #[test]
    fn test_predict_grid_matches_single_predictions() {
        let file = write_artifact(&artifact());
        let model = TrainedModel::new(file.path());
        let cells = vec![cell_with(0.2, 24.0), cell_with(1.0, 26.5)];
        let grid = model.predict_grid(&cells).unwrap();
        for (cell, score) in cells.iter().zip(&grid) {
            assert_eq!(model.predict(cell).unwrap(), *score);
        }
    }
}
