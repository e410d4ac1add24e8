//! LINKFIELD API - Search Endpoint for the Content Picker
//!
//! Exposes `POST /search` over Axum: validates the requested content type,
//! resolves matching content through `linkfield-resolver`, and answers with
//! a rendered selection table or structured rows.

pub mod config;
pub mod error;
#[cfg(feature = "openapi")]
pub mod openapi;
pub mod render;
pub mod routes;
pub mod sanitize;
pub mod state;
pub mod telemetry;
pub mod types;

// Re-export commonly used types
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
#[cfg(feature = "openapi")]
pub use openapi::ApiDoc;
pub use render::{render_rows, render_table};
pub use routes::create_api_router;
pub use state::AppState;
pub use types::*;
