//! Hotspot grid endpoint.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::types::HotspotsResponse;
use axum::extract::{Query, State};
use axum::Json;
use pelagos_core::PredictionMode;
use serde::Deserialize;

/// Query parameters for `GET /hotspots`.
#[derive(Debug, Clone, Deserialize)]
pub struct HotspotQuery {
    /// auto | simulated | real (default: auto)
    pub mode: Option<String>,
    /// Grid rows (default: the configured region default, 40)
    pub grid_n: Option<usize>,
    /// Grid columns (default: 40)
    pub grid_m: Option<usize>,
}

/// GET /hotspots - compute (or serve cached) suitability grid.
///
/// Bad request parameters are HTTP errors; a prediction failure after the
/// whole fallback chain is a 200 envelope with `status: "error"` and an
/// empty hotspot list, so the map layer degrades instead of breaking.
pub async fn get_hotspots(
    State(state): State<AppState>,
    Query(query): Query<HotspotQuery>,
) -> ApiResult<Json<HotspotsResponse>> {
    let mode: PredictionMode = match query.mode.as_deref() {
        None => PredictionMode::Auto,
        Some(raw) => raw
            .parse()
            .map_err(|e: String| ApiError::invalid_input(e))?,
    };

    let max_dim = state.config.max_grid_dim;
    let grid_n = query.grid_n.unwrap_or(pelagos_core::PelagosConfig::DEFAULT_GRID);
    let grid_m = query.grid_m.unwrap_or(pelagos_core::PelagosConfig::DEFAULT_GRID);
    for (name, value) in [("grid_n", grid_n), ("grid_m", grid_m)] {
        if value == 0 || value > max_dim {
            return Err(ApiError::invalid_range(name, 1, max_dim as i64));
        }
    }

    // Grid scoring is CPU-bound; keep it off the async workers.
    let prediction = state.prediction.clone();
    let outcome = tokio::task::spawn_blocking(move || prediction.get_hotspots(grid_n, grid_m, mode))
        .await
        .map_err(|e| ApiError::internal_error(format!("prediction task failed: {e}")))?;

    match outcome {
        Ok(result) => Ok(Json(HotspotsResponse::success(&result))),
        Err(err) => {
            tracing::warn!(error = %err, ?mode, "Hotspot request degraded to error envelope");
            Ok(Json(HotspotsResponse::error(err.to_string())))
        }
    }
}
