//! Probes for load balancers and the admin dashboard.
//!
//! `ping` answers a bare `pong`; `live` also reports the build version,
//! uptime and which content types this instance will search. An instance
//! that can search no content type reports itself unhealthy.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HealthResponse {
    pub status: HealthStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HealthDetails>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Snapshot returned by the liveness probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HealthDetails {
    pub version: String,
    pub uptime_seconds: u64,
    /// Sorted canonical keys, e.g. `category`, `post`, `user`.
    pub content_types: Vec<String>,
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/health/ping",
    tag = "Health",
    responses(
        (status = 200, description = "Always `pong` while the listener is up", body = String),
    ),
))]
pub async fn ping() -> impl IntoResponse {
    (StatusCode::OK, "pong")
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Version, uptime and searchable content types", body = HealthResponse),
        (status = 503, description = "No content type is enabled", body = HealthResponse),
    ),
))]
pub async fn live(State(state): State<AppState>) -> impl IntoResponse {
    let details = snapshot(&state);
    if details.content_types.is_empty() {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: HealthStatus::Unhealthy,
                message: Some("no content types enabled".to_string()),
                details: Some(details),
            }),
        );
    }

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: HealthStatus::Healthy,
            message: None,
            details: Some(details),
        }),
    )
}

fn snapshot(state: &AppState) -> HealthDetails {
    let mut content_types: Vec<String> = state
        .resolver
        .registry()
        .kinds()
        .map(|kind| kind.as_key().to_string())
        .collect();
    content_types.sort_unstable();

    HealthDetails {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: seconds_since(state.start_time),
        content_types,
    }
}

fn seconds_since(start: Instant) -> u64 {
    start.elapsed().as_secs()
}

pub fn create_router() -> Router<AppState> {
    Router::new().route("/ping", get(ping)).route("/live", get(live))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_status_serializes_alone() {
        let response = HealthResponse {
            status: HealthStatus::Unhealthy,
            message: None,
            details: None,
        };
        assert_eq!(
            serde_json::to_string(&response).unwrap(),
            r#"{"status":"unhealthy"}"#
        );
    }

    #[test]
    fn fresh_process_reports_zero_uptime() {
        assert_eq!(seconds_since(Instant::now()), 0);
    }
}
