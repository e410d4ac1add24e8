//! Search Endpoint Tests
//!
//! Drives the assembled router in-process:
//! - Unknown types are rejected with `-1` before the store is touched
//! - Empty result sets answer with the translated no-items message
//! - Store failures surface as the generic error with a 500
//! - Html and rows formats carry the same results

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use linkfield_api::{create_api_router, ApiConfig, AppState, SearchData, SearchResponse};
use linkfield_test_utils::assertions::assert_failure;
use linkfield_test_utils::fixtures;
use linkfield_test_utils::{ContentStore, FailingStore, InMemoryContentStore, RecordingStore};
use serde_json::{json, Value};
use tower::ServiceExt;

// ============================================================================
// HELPERS
// ============================================================================

fn app(store: Arc<dyn ContentStore>) -> Router {
    create_api_router(AppState::with_store(store), &ApiConfig::default())
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

async fn search(app: Router, body: Value) -> (StatusCode, SearchResponse) {
    let request = Request::builder()
        .uri("/search")
        .method("POST")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, bytes) = send(app, request).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

// ============================================================================
// REJECTIONS
// ============================================================================

#[tokio::test]
async fn test_unknown_type_rejected_without_store_call() {
    let store = Arc::new(RecordingStore::new(Arc::new(fixtures::site_store())));
    let (status, response) = search(app(store.clone()), json!({"search": "x", "type": "bogus"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_failure(&response, "-1");
    assert_eq!(store.call_count(), 0);
}

#[tokio::test]
async fn test_disabled_type_rejected() {
    let store = Arc::new(RecordingStore::new(Arc::new(fixtures::site_store())));
    let config = ApiConfig {
        enabled_types: vec!["users".to_string()],
        ..Default::default()
    };
    let state = AppState::new(
        linkfield_resolver::ContentResolver::new(store.clone(), config.registry().unwrap()),
        Arc::new(linkfield_test_utils::Catalog::english()),
    );
    let router = create_api_router(state, &config);

    let (status, response) = search(router, json!({"type": "post"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_failure(&response, "-1");
    assert_eq!(store.call_count(), 0);
}

#[tokio::test]
async fn test_malformed_body_rejected() {
    let request = Request::builder()
        .uri("/search")
        .method("POST")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, bytes) = send(app(Arc::new(fixtures::site_store())), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let response: SearchResponse = serde_json::from_slice(&bytes).unwrap();
    assert_failure(&response, "-1");
}

// ============================================================================
// RESULTS
// ============================================================================

#[tokio::test]
async fn test_no_matches_is_translated_message() {
    let store = Arc::new(InMemoryContentStore::new());
    let (status, response) = search(app(store), json!({"search": "hello", "type": "post"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_failure(&response, "No items found.");
}

#[tokio::test]
async fn test_store_failure_is_generic_error() {
    let (status, response) = search(app(Arc::new(FailingStore)), json!({"type": "post"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_failure(
        &response,
        "An error has occurred. Please reload the page and try again.",
    );
}

#[tokio::test]
async fn test_missing_type_defaults_to_posts() {
    let store = Arc::new(RecordingStore::new(Arc::new(fixtures::site_store())));
    let (status, response) = search(app(store.clone()), json!({"search": "hello"})).await;

    assert_eq!(status, StatusCode::OK);
    assert!(response.success);
    assert_eq!(store.calls_for("posts").len(), 1);
}

#[tokio::test]
async fn test_html_table_lists_matching_posts() {
    let store = Arc::new(fixtures::site_store());
    let (status, response) = search(
        app(store),
        json!({"search": "<b>hello</b>", "type": "posts"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let SearchData::Text(html) = response.data else {
        panic!("expected html fragment");
    };
    assert!(html.starts_with(r#"<table class="widefat">"#));
    assert!(html.contains(r#"value="1""#));
    assert!(html.contains(r#"value="3""#));
    assert!(!html.contains(r#"value="2""#));
    assert!(html.contains("https://site.test/?p=1"));
}

#[tokio::test]
async fn test_extended_mode_table() {
    let store = Arc::new(fixtures::site_store());
    let (status, response) = search(
        app(store),
        json!({"search": "hello", "type": "post", "mode": "extended"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let SearchData::Text(html) = response.data else {
        panic!("expected html fragment");
    };
    assert!(html.contains("<em>Choose one</em>"));
    assert!(html.contains(r#"<td class="found-key">3</td>"#));
    assert_eq!(html.matches(r#"type="radio""#).count(), 2);
}

#[tokio::test]
async fn test_rows_format_excludes_current() {
    let store = Arc::new(fixtures::site_store());
    let (status, response) = search(
        app(store),
        json!({
            "search": "hello",
            "type": "post",
            "settings": {"exclude": "current"},
            "current": 1,
            "format": "rows"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let SearchData::Rows(rows) = response.data else {
        panic!("expected rows");
    };
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].key, "3");
    assert_eq!(rows[0].title, "Hello Again");
    assert!(rows[0].alternate);
}

#[tokio::test]
async fn test_categories_listed_with_depth() {
    let store = Arc::new(fixtures::scenario_a_store());
    let (_, response) = search(app(store), json!({"type": "categories", "format": "rows"})).await;

    let SearchData::Rows(rows) = response.data else {
        panic!("expected rows");
    };
    let titles: Vec<&str> = rows.iter().map(|row| row.title.as_str()).collect();
    assert_eq!(titles, vec!["News", "Sports", "- Football"]);
}

#[tokio::test]
async fn test_value_field_keys_results() {
    let store = Arc::new(fixtures::site_store());
    let (_, response) = search(
        app(store),
        json!({"type": "post", "search": "rust", "field": "post_name", "format": "rows"}),
    )
    .await;

    let SearchData::Rows(rows) = response.data else {
        panic!("expected rows");
    };
    assert_eq!(rows[0].key, "rust-notes");
}

// ============================================================================
// HEALTH, OPENAPI AND CORS
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let router = app(Arc::new(InMemoryContentStore::new()));

    let ping = Request::builder().uri("/health/ping").body(Body::empty()).unwrap();
    let (status, body) = send(router.clone(), ping).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"pong");

    let live = Request::builder().uri("/health/live").body(Body::empty()).unwrap();
    let (status, body) = send(router, live).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["details"]["content_types"].as_array().map(Vec::len), Some(9));
}

#[tokio::test]
async fn test_live_reports_unhealthy_without_content_types() {
    let state = AppState::new(
        linkfield_resolver::ContentResolver::new(
            Arc::new(InMemoryContentStore::new()),
            linkfield_test_utils::ContentTypeRegistry::restricted([]),
        ),
        Arc::new(linkfield_test_utils::Catalog::english()),
    );
    let router = create_api_router(state, &ApiConfig::default());

    let live = Request::builder().uri("/health/live").body(Body::empty()).unwrap();
    let (status, body) = send(router, live).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "unhealthy");
    assert_eq!(json["details"]["content_types"], json!([]));
}

#[cfg(feature = "openapi")]
#[tokio::test]
async fn test_openapi_document_served() {
    let request = Request::builder().uri("/openapi.json").body(Body::empty()).unwrap();
    let (status, body) = send(app(Arc::new(InMemoryContentStore::new())), request).await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert!(json["paths"]["/search"].is_object());
}

#[tokio::test]
async fn test_cors_allows_any_origin_by_default() {
    let request = Request::builder()
        .uri("/health/ping")
        .header("origin", "https://admin.example.com")
        .body(Body::empty())
        .unwrap();
    let response = app(Arc::new(InMemoryContentStore::new()))
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
