//! HTTP surface: search, health probes and the cross-origin policy that lets
//! an admin screen on another host call `/search`.

pub mod health;
pub mod search;

use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::state::AppState;

pub use health::create_router as health_router;
pub use search::create_router as search_router;

#[cfg(feature = "openapi")]
async fn openapi_json() -> impl axum::response::IntoResponse {
    use utoipa::OpenApi;
    axum::Json(crate::openapi::ApiDoc::openapi())
}

fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if config.cors_origins.is_empty() {
        tracing::info!("no CORS origins configured, accepting any");
        cors.allow_origin(Any)
    } else {
        tracing::info!(origins = ?config.cors_origins, "restricting CORS origins");
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

/// `POST /search`, the `/health` probes and, with the `openapi` feature,
/// `GET /openapi.json`.
pub fn create_api_router(state: AppState, config: &ApiConfig) -> Router {
    let router = Router::new()
        .merge(search_router())
        .nest("/health", health_router());

    #[cfg(feature = "openapi")]
    let router = router.route("/openapi.json", axum::routing::get(openapi_json));

    router
        .layer(build_cors_layer(config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
