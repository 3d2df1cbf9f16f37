//! Error types for PELAGOS operations

use crate::covariate::Covariate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Raster layer errors.
///
/// `DataUnavailable` covers both missing and unparsable layer files; a
/// grid request can recover by trying another covariate set or fail whole.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RasterError {
    #[error("Covariate data unavailable for {covariate} at {path}: {reason}")]
    DataUnavailable {
        covariate: Covariate,
        path: String,
        reason: String,
    },

    #[error("Invalid raster layer for {covariate}: {reason}")]
    InvalidLayer { covariate: Covariate, reason: String },
}

/// Suitability model errors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ModelError {
    #[error("Model artifact unavailable at {path}: {reason}")]
    ModelUnavailable { path: String, reason: String },

    /// A malformed feature vector reached the predictor. This indicates an
    /// assembler bug and should not occur in normal operation.
    #[error("Inference failed: {reason}")]
    InferenceError { reason: String },
}

/// A single rejected field with the reason it was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
    pub field: String,
    pub reason: String,
}

/// Validation error carrying every offending field.
///
/// Ingestion reports all failures at once rather than stopping at the
/// first, so tag operators see the full picture in one round trip.
#[derive(Debug, Clone, Error, PartialEq, Serialize, Deserialize)]
#[error("Validation failed on {} field(s)", .failures.len())]
pub struct ValidationError {
    pub failures: Vec<ValidationFailure>,
}

impl ValidationError {
    /// An empty accumulator; convert with [`into_result`](Self::into_result).
    pub fn empty() -> Self {
        Self { failures: Vec::new() }
    }

    /// A validation error for a single field.
    pub fn single(field: impl Into<String>, reason: impl Into<String>) -> Self {
        let mut err = Self::empty();
        err.push(field, reason);
        err
    }

    /// Record a failed field.
    pub fn push(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        self.failures.push(ValidationFailure {
            field: field.into(),
            reason: reason.into(),
        });
    }

    /// Names of the rejected fields, in check order.
    pub fn fields(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.field.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// `Ok(())` when no failures were recorded, `Err(self)` otherwise.
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Event store errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Append failed: {reason}")]
    AppendFailed { reason: String },

    #[error("Duplicate event id: {id}")]
    DuplicateId { id: Uuid },

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Facade-level prediction errors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PredictionError {
    /// Every predictor in the fallback chain failed. `attempts` records
    /// one failure description per predictor, in consultation order.
    #[error("Prediction unavailable: all {} predictor(s) failed", .attempts.len())]
    Unavailable { attempts: Vec<String> },
}

/// Master error type for all PELAGOS errors.
#[derive(Debug, Clone, Error)]
pub enum PelagosError {
    #[error("Raster error: {0}")]
    Raster(#[from] RasterError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Prediction error: {0}")]
    Prediction(#[from] PredictionError),
}

/// Result type alias for PELAGOS operations.
pub type PelagosResult<T> = Result<T, PelagosError>;

// ============================================================================
// TESTS
// ============================================================================
