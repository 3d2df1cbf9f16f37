//! PELAGOS API server entry point.
//!
//! Bootstraps configuration, loads the region's covariate rasters, wires
//! the prediction facade and telemetry ingestor, and starts the axum
//! server. A region with no loadable rasters still serves: the simulated
//! predictor needs none, and assembled cells fall back to the
//! missing-value policy (flagged low-confidence).

use std::net::SocketAddr;
use std::sync::Arc;

use pelagos_api::{create_router, ApiConfig, ApiError, ApiResult, AppState};
use pelagos_core::PelagosConfig;
use pelagos_predict::PredictionService;
use pelagos_raster::{FeatureAssembler, RasterStore};
use pelagos_telemetry::{InMemoryEventStore, TelemetryIngestor};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ApiResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let api_config = ApiConfig::from_env();
    let mut core_config = PelagosConfig::default();
    core_config.data_dir = api_config.data_dir.clone();
    core_config.model_path = api_config.model_path.clone();

    let store = match RasterStore::load(
        &core_config.data_dir,
        core_config.region.clone(),
        &core_config.required_covariates,
        &core_config.optional_covariates,
    ) {
        Ok(store) => store,
        Err(err) => {
            tracing::warn!(
                error = %err,
                "Covariate rasters unavailable, serving simulated predictions only"
            );
            RasterStore::empty(core_config.region.clone())
        }
    };

    let mut covariates = core_config.required_covariates.clone();
    covariates.extend(&core_config.optional_covariates);
    let assembler = FeatureAssembler::new(
        Arc::new(store),
        covariates,
        core_config.missing_value_policy,
    );
    let prediction = Arc::new(PredictionService::standard(
        assembler,
        &core_config.model_path,
    ));

    let event_store = Arc::new(InMemoryEventStore::new());
    let ingestor = Arc::new(TelemetryIngestor::new(event_store));

    let state = AppState::new(prediction, ingestor, api_config.clone());
    let app = create_router(state, &api_config);

    let addr = resolve_bind_addr()?;
    tracing::info!(%addr, "Starting PELAGOS API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

fn resolve_bind_addr() -> ApiResult<SocketAddr> {
    let host = std::env::var("PELAGOS_API_BIND").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port_str = std::env::var("PORT")
        .ok()
        .or_else(|| std::env::var("PELAGOS_API_PORT").ok())
        .unwrap_or_else(|| "8000".to_string());
    let port = port_str
        .parse::<u16>()
        .map_err(|_| ApiError::invalid_input(format!("Invalid port value: {}", port_str)))?;

    let addr = format!("{}:{}", host, port);
    addr.parse::<SocketAddr>()
        .map_err(|e| ApiError::invalid_input(format!("Invalid bind address {}: {}", addr, e)))
}
