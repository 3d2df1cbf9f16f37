//! API configuration loaded from environment variables with development
//! defaults, in the usual twelve-factor shape.

use std::path::PathBuf;

/// Boundary-layer configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins (dev mode).
    pub cors_origins: Vec<String>,

    /// Root directory of covariate raster exports.
    pub data_dir: PathBuf,

    /// Trained model artifact path.
    pub model_path: PathBuf,

    /// Upper bound accepted for grid_n / grid_m query parameters.
    pub max_grid_dim: usize,

    /// Upper bound accepted for the events `limit` query parameter.
    pub max_event_limit: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(), // Empty = allow all
            data_dir: PathBuf::from("data"),
            model_path: PathBuf::from("data/habitat_model.json"),
            max_grid_dim: 200,
            max_event_limit: 500,
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `PELAGOS_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `PELAGOS_DATA_DIR`: Raster export root (default: "data")
    /// - `PELAGOS_MODEL_PATH`: Model artifact (default: "data/habitat_model.json")
    /// - `PELAGOS_MAX_GRID_DIM`: Largest accepted grid dimension (default: 200)
    /// - `PELAGOS_MAX_EVENT_LIMIT`: Largest accepted events limit (default: 500)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let cors_origins = std::env::var("PELAGOS_CORS_ORIGINS")
            .ok()
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let data_dir = std::env::var("PELAGOS_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let model_path = std::env::var("PELAGOS_MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.model_path);

        let max_grid_dim = std::env::var("PELAGOS_MAX_GRID_DIM")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_grid_dim);

        let max_event_limit = std::env::var("PELAGOS_MAX_EVENT_LIMIT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_event_limit);

        Self {
            cors_origins,
            data_dir,
            model_path,
            max_grid_dim,
            max_event_limit,
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
    fn test_defaults() {
        let config = ApiConfig::default();
        assert!(config.cors_origins.is_empty());
        assert_eq!(config.max_grid_dim, 200);
        assert_eq!(config.data_dir, PathBuf::from("data"));
    }
}
