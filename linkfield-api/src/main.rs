//! LINKFIELD API Server Entry Point
//!
//! Reads configuration from the environment, seeds the in-memory store and
//! starts the Axum HTTP server.

use axum::Router;
use linkfield_api::telemetry::{init_tracing, TelemetryConfig};
use linkfield_api::{create_api_router, ApiConfig, ApiError, ApiResult, AppState};

#[tokio::main]
async fn main() -> ApiResult<()> {
    let api_config = ApiConfig::from_env();
    init_tracing(&TelemetryConfig::default().with_json(api_config.log_json))?;

    let state = AppState::from_config(&api_config)?;
    let app: Router = create_api_router(state, &api_config);

    let addr = api_config.bind_addr()?;
    tracing::info!(%addr, "Starting LINKFIELD API server");

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
