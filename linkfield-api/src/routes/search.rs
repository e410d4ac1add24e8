//! Search Endpoint
//!
//! `POST /search` resolves a content type and search term into selectable
//! results, answering with a `{success, data}` envelope.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use linkfield_core::{keys, ResolveError, TEXT_DOMAIN};
use linkfield_resolver::ResolveRequest;
use tracing::{debug, error, warn};

use crate::render::{render_rows, render_table};
use crate::sanitize;
use crate::state::AppState;
use crate::types::{ResponseFormat, SearchRequest, SearchResponse};

type Envelope = (StatusCode, Json<SearchResponse>);

fn invalid_request() -> Envelope {
    (StatusCode::BAD_REQUEST, Json(SearchResponse::invalid_request()))
}

/// POST /search - Resolve and render matching content
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/search",
    tag = "Search",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Results, or a translated no-items message", body = SearchResponse),
        (status = 400, description = "Unknown or disabled content type", body = SearchResponse),
        (status = 500, description = "Content store failure", body = SearchResponse),
    ),
))]
pub async fn search(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Envelope {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(error = %rejection, "Rejected unreadable search request");
            return invalid_request();
        }
    };

    let requested = request.content_type();
    let Some(kind) = state.resolver.registry().lookup(requested) else {
        warn!(requested, "Rejected search for unsupported content type");
        return invalid_request();
    };

    let mut resolve = ResolveRequest::new(sanitize::search_term(&request.search))
        .with_settings(request.settings.clone());
    if let Some(field) = request.field.as_deref() {
        resolve = resolve.with_value_field(field);
    }
    if let Some(current) = request.current.as_deref() {
        resolve = resolve.with_current(current);
    }

    let results = match state.resolver.resolve_kind(kind, &resolve).await {
        Ok(results) => results,
        Err(ResolveError::Store(err)) => {
            error!(kind = %kind, error = %err, "Content store failed during search");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SearchResponse::failure(
                    state.translator.t(keys::AJAX_ERROR, TEXT_DOMAIN),
                )),
            );
        }
        Err(err) => {
            warn!(kind = %kind, error = %err, "Search type has no strategy");
            return invalid_request();
        }
    };

    if results.is_empty() {
        debug!(kind = %kind, search = %resolve.search, "No items found");
        return (
            StatusCode::OK,
            Json(SearchResponse::failure(
                state.translator.t(keys::AJAX_NO_ITEMS_FOUND, TEXT_DOMAIN),
            )),
        );
    }

    let translator = state.translator.as_ref();
    let response = match request.format {
        ResponseFormat::Html => {
            SearchResponse::html(render_table(&results, request.mode, translator))
        }
        ResponseFormat::Rows => SearchResponse::rows(render_rows(&results, translator)),
    };
    (StatusCode::OK, Json(response))
}

pub fn create_router() -> Router<AppState> {
    Router::new().route("/search", post(search))
}
