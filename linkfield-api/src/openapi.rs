//! OpenAPI Specification for LINKFIELD API
//!
//! Generated with utoipa from the route annotations and wire types.

use utoipa::OpenApi;

use crate::error::{ApiError, ErrorCode};
use crate::routes::{health, search};
use crate::types::{ResponseFormat, ResultRow, SearchData, SearchRequest, SearchResponse};
use linkfield_core::{FieldMode, QueryArgs};

/// OpenAPI document for LINKFIELD API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "LINKFIELD API",
        description = "Content search endpoint backing the linkfield picker",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local Development")
    ),
    tags(
        (name = "Search", description = "Content search for the picker modal"),
        (name = "Health", description = "Liveness checks")
    ),
    paths(
        // === Search Routes ===
        search::search,

        // === Health Routes ===
        health::ping,
        health::live,
    ),
    components(
        schemas(
            // === Error Types ===
            ApiError, ErrorCode,

            // === Search Types ===
            SearchRequest, SearchResponse, SearchData, ResultRow, ResponseFormat, QueryArgs, FieldMode,

            // === Health Types ===
            health::HealthResponse, health::HealthStatus, health::HealthDetails,
        )
    )
)]
pub struct ApiDoc;
