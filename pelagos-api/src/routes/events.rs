//! Telemetry ingestion and listing endpoints.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::types::{EventsResponse, IngestResponse};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use pelagos_core::{PelagosError, RawTagEvent};
use serde::Deserialize;

/// Query parameters for `GET /events`.
#[derive(Debug, Clone, Deserialize)]
pub struct EventsQuery {
    /// Maximum number of events to return (default: 10).
    pub limit: Option<usize>,
}

/// POST /events/ingest - validate and store a tag event.
///
/// Validation failures answer 422 with per-field errors; the event store
/// is untouched in that case. Storage failures are internal errors.
pub async fn ingest_event(
    State(state): State<AppState>,
    Json(raw): Json<RawTagEvent>,
) -> ApiResult<(StatusCode, Json<IngestResponse>)> {
    match state.ingestor.ingest(raw).await {
        Ok(event) => Ok((StatusCode::OK, Json(IngestResponse::success(event.id)))),
        Err(PelagosError::Validation(validation)) => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(IngestResponse::rejected(validation.failures)),
        )),
        Err(other) => Err(ApiError::from(other)),
    }
}

/// GET /events - most recent tag events, newest first.
pub async fn get_events(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> ApiResult<Json<EventsResponse>> {
    let limit = query.limit.unwrap_or(10);
    if limit > state.config.max_event_limit {
        return Err(ApiError::invalid_range(
            "limit",
            0,
            state.config.max_event_limit as i64,
        ));
    }
    let events = state.ingestor.list_recent(limit).await?;
    Ok(Json(EventsResponse::success(events)))
}
