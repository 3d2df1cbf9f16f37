//! PELAGOS API - HTTP Boundary Layer
//!
//! Thin axum glue over the prediction facade and the telemetry ingestor.
//! Everything here translates between transport envelopes and the typed
//! core; no domain logic lives in this crate.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod types;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use routes::create_router;
pub use state::AppState;
pub use types::{
    EventsResponse, HotspotPoint, HotspotsResponse, IngestResponse, ResponseStatus,
};
