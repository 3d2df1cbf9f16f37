//! Status and health endpoints. No authentication, cheap to call.

use crate::error::ApiResult;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

/// Root status response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub status: String,
    pub message: String,
    pub version: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub region: String,
    /// Covariates with a loaded raster layer.
    pub loaded_covariates: Vec<String>,
    pub events_stored: usize,
    pub uptime_seconds: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    /// Serving, but some covariate layers never loaded.
    Degraded,
}

/// GET / - API status.
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        status: "connected".to_string(),
        message: "PELAGOS habitat prediction API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /health - component health.
pub async fn health(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let loaded = state.prediction.loaded_covariates();
    let events_stored = state.ingestor.store().len().await?;
    let status = if loaded.is_empty() {
        HealthStatus::Degraded
    } else {
        HealthStatus::Healthy
    };
    Ok(Json(HealthResponse {
        status,
        region: state.prediction.region().name.clone(),
        loaded_covariates: loaded.iter().map(|c| c.to_string()).collect(),
        events_stored,
        uptime_seconds: state.start_time.elapsed().as_secs(),
    }))
}
