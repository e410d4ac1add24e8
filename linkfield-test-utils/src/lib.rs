//! LINKFIELD Test Utilities
//!
//! Centralized test infrastructure for the LINKFIELD workspace:
//! - Store wrappers that record or fail every call
//! - Search transports for driving the widget with or without a socket
//! - Proptest generators for aliases, results and category trees
//! - Test fixtures for the common scenarios
//! - Custom assertions for rendered markup and depth prefixes

// Re-export core types for convenience
pub use linkfield_core::{
    Catalog, ContentKind, ContentRecord, ContentTypeRegistry, QueryArgs, ResolveError, ResultSet,
    SearchResult, StoreError,
};
pub use linkfield_store::{Collection, ContentStore, InMemoryContentStore, LinkTarget, StoreResult};

use async_trait::async_trait;
use linkfield_api::{ResultRow, SearchRequest, SearchResponse};
use linkfield_widget::{SearchTransport, WidgetError, WidgetResult};
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ============================================================================
// STORE WRAPPERS
// ============================================================================

/// One call observed by [`RecordingStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoreCall {
    pub collection: &'static str,
    pub args: QueryArgs,
}

/// Delegates to an inner store and records every listing call.
pub struct RecordingStore {
    inner: Arc<dyn ContentStore>,
    calls: Mutex<Vec<StoreCall>>,
}

impl RecordingStore {
    pub fn new(inner: Arc<dyn ContentStore>) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    pub fn calls_for(&self, collection: &str) -> Vec<StoreCall> {
        lock(&self.calls)
            .iter()
            .filter(|call| call.collection == collection)
            .cloned()
            .collect()
    }

    fn record(&self, collection: &'static str, args: &QueryArgs) {
        lock(&self.calls).push(StoreCall {
            collection,
            args: args.clone(),
        });
    }
}

#[async_trait]
impl ContentStore for RecordingStore {
    async fn posts(&self, args: &QueryArgs) -> StoreResult<Vec<ContentRecord>> {
        self.record("posts", args);
        self.inner.posts(args).await
    }

    async fn categories(&self, args: &QueryArgs) -> StoreResult<Vec<ContentRecord>> {
        self.record("categories", args);
        self.inner.categories(args).await
    }

    async fn nav_menus(&self, args: &QueryArgs) -> StoreResult<Vec<ContentRecord>> {
        self.record("menus", args);
        self.inner.nav_menus(args).await
    }

    async fn post_types(&self, args: &QueryArgs) -> StoreResult<Vec<ContentRecord>> {
        self.record("post_types", args);
        self.inner.post_types(args).await
    }

    async fn tags_for(&self, object_id: u64) -> StoreResult<Vec<ContentRecord>> {
        self.record("tags", &QueryArgs::new().with("object_id", object_id));
        self.inner.tags_for(object_id).await
    }

    async fn taxonomies(&self, args: &QueryArgs) -> StoreResult<Vec<ContentRecord>> {
        self.record("taxonomies", args);
        self.inner.taxonomies(args).await
    }

    async fn terms(&self, args: &QueryArgs) -> StoreResult<Vec<ContentRecord>> {
        self.record("terms", args);
        self.inner.terms(args).await
    }

    async fn users(&self, args: &QueryArgs) -> StoreResult<Vec<ContentRecord>> {
        self.record("users", args);
        self.inner.users(args).await
    }

    fn link(&self, target: &LinkTarget) -> String {
        self.inner.link(target)
    }
}

/// Store whose every listing fails with `QueryFailed`.
#[derive(Debug, Clone, Default)]
pub struct FailingStore;

impl FailingStore {
    fn fail(collection: &str) -> StoreResult<Vec<ContentRecord>> {
        Err(StoreError::QueryFailed {
            collection: collection.to_string(),
            reason: "backend offline".to_string(),
        })
    }
}

#[async_trait]
impl ContentStore for FailingStore {
    async fn posts(&self, _args: &QueryArgs) -> StoreResult<Vec<ContentRecord>> {
        Self::fail("posts")
    }

    async fn categories(&self, _args: &QueryArgs) -> StoreResult<Vec<ContentRecord>> {
        Self::fail("categories")
    }

    async fn nav_menus(&self, _args: &QueryArgs) -> StoreResult<Vec<ContentRecord>> {
        Self::fail("menus")
    }

    async fn post_types(&self, _args: &QueryArgs) -> StoreResult<Vec<ContentRecord>> {
        Self::fail("post_types")
    }

    async fn tags_for(&self, _object_id: u64) -> StoreResult<Vec<ContentRecord>> {
        Self::fail("tags")
    }

    async fn taxonomies(&self, _args: &QueryArgs) -> StoreResult<Vec<ContentRecord>> {
        Self::fail("taxonomies")
    }

    async fn terms(&self, _args: &QueryArgs) -> StoreResult<Vec<ContentRecord>> {
        Self::fail("terms")
    }

    async fn users(&self, _args: &QueryArgs) -> StoreResult<Vec<ContentRecord>> {
        Self::fail("users")
    }

    fn link(&self, _target: &LinkTarget) -> String {
        String::new()
    }
}

// ============================================================================
// SEARCH TRANSPORTS
// ============================================================================

/// Scripted reply of [`MockTransport`].
#[derive(Debug, Clone)]
pub enum MockReply {
    Respond(SearchResponse),
    /// Simulated network failure
    Fail(String),
}

/// Replays scripted replies in order and records every request.
///
/// Clones share the script and the request log, so a test can keep one
/// handle while the widget owns another. With the script exhausted it
/// answers with an unsuccessful "No items found." envelope.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    requests: Arc<Mutex<Vec<SearchRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(self, reply: MockReply) -> Self {
        self.push(reply);
        self
    }

    pub fn with_rows(self, rows: Vec<ResultRow>) -> Self {
        self.with_reply(MockReply::Respond(SearchResponse::rows(rows)))
    }

    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.with_reply(MockReply::Fail(message.into()))
    }

    /// Queue another reply after construction.
    pub fn push(&self, reply: MockReply) {
        lock(&self.replies).push_back(reply);
    }

    pub fn requests(&self) -> Vec<SearchRequest> {
        lock(&self.requests).clone()
    }

    pub fn last_request(&self) -> Option<SearchRequest> {
        lock(&self.requests).last().cloned()
    }
}

#[async_trait]
impl SearchTransport for MockTransport {
    async fn search(&self, request: &SearchRequest) -> WidgetResult<SearchResponse> {
        lock(&self.requests).push(request.clone());
        match lock(&self.replies).pop_front() {
            Some(MockReply::Respond(response)) => Ok(response),
            Some(MockReply::Fail(message)) => Err(WidgetError::InvalidResponse(message)),
            None => Ok(SearchResponse::failure("No items found.")),
        }
    }
}

/// Sends requests straight into an API router, no socket involved.
#[derive(Clone)]
pub struct RouterTransport {
    router: axum::Router,
}

impl RouterTransport {
    pub fn new(router: axum::Router) -> Self {
        Self { router }
    }
}

#[async_trait]
impl SearchTransport for RouterTransport {
    async fn search(&self, request: &SearchRequest) -> WidgetResult<SearchResponse> {
        use tower::ServiceExt;

        let http_request = axum::http::Request::builder()
            .method("POST")
            .uri("/search")
            .header("content-type", "application/json")
            .body(axum::body::Body::from(serde_json::to_vec(request)?))
            .map_err(|e| WidgetError::InvalidResponse(e.to_string()))?;

        let response = self
            .router
            .clone()
            .oneshot(http_request)
            .await
            .map_err(|e| WidgetError::InvalidResponse(e.to_string()))?;
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| WidgetError::InvalidResponse(e.to_string()))?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Serve `router` on an ephemeral localhost port for the rest of the
/// test's runtime. Returns the bound address.
pub async fn serve(router: axum::Router) -> std::io::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok(addr)
}

// ============================================================================
// GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for LINKFIELD types.

    use super::*;
    use proptest::prelude::*;

    /// Any content kind.
    pub fn arb_content_kind() -> impl Strategy<Value = ContentKind> {
        prop::sample::select(ContentKind::ALL.to_vec())
    }

    /// An alias of some kind, with random case and surrounding whitespace,
    /// paired with the kind it names.
    pub fn arb_alias() -> impl Strategy<Value = (String, ContentKind)> {
        arb_content_kind()
            .prop_flat_map(|kind| {
                (
                    prop::sample::select(kind.aliases().to_vec()),
                    Just(kind),
                    any::<bool>(),
                    " {0,2}",
                    " {0,2}",
                )
            })
            .prop_map(|(alias, kind, upper, lead, trail)| {
                let alias = if upper {
                    alias.to_uppercase()
                } else {
                    alias.to_string()
                };
                (format!("{}{}{}", lead, alias, trail), kind)
            })
    }

    /// A type name no kind accepts.
    pub fn arb_unknown_alias() -> impl Strategy<Value = String> {
        "[a-z]{1,12}".prop_filter("must not be a known alias", |name| {
            name.parse::<ContentKind>().is_err()
        })
    }

    /// Text likely to need escaping in markup.
    pub fn arb_markup_text() -> impl Strategy<Value = String> {
        prop::collection::vec(
            prop_oneof![
                "[a-zA-Z0-9 ]{1,6}",
                Just("<".to_string()),
                Just(">".to_string()),
                Just("&".to_string()),
                Just("\"".to_string()),
                Just("'".to_string()),
                Just("<script>".to_string()),
            ],
            0..6,
        )
        .prop_map(|parts| parts.concat())
    }

    pub fn arb_search_result() -> impl Strategy<Value = SearchResult> {
        ("[a-z0-9\"<>&-]{1,8}", arb_markup_text(), "https://x/[a-z0-9?=&<>\"]{0,10}")
            .prop_map(|(key, title, url)| SearchResult::new(key, title, url))
    }

    /// A result set of up to `max` entries (keys deduplicated by the set).
    pub fn arb_result_set(max: usize) -> impl Strategy<Value = ResultSet> {
        prop::collection::vec(arb_search_result(), 0..=max)
            .prop_map(|results| results.into_iter().collect())
    }

    /// An acyclic category forest: every parent id is smaller than the
    /// child's own id, `0` meaning root. Ids run from 1 upward.
    pub fn arb_category_forest(max: usize) -> impl Strategy<Value = Vec<ContentRecord>> {
        prop::collection::vec((any::<prop::sample::Index>(), "[A-Z][a-z]{2,8}"), 1..=max).prop_map(
            |specs| {
                specs
                    .into_iter()
                    .enumerate()
                    .map(|(index, (parent, name))| {
                        let id = index as u64 + 1;
                        // Candidates are 0 (root) through id - 1.
                        let parent_id = parent.index(id as usize) as u64;
                        fixtures::category(id, &name, parent_id)
                    })
                    .collect()
            },
        )
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built records and stores for common testing scenarios.

    use super::*;

    pub const SITE_URL: &str = "https://site.test";

    pub fn post(id: u64, title: &str) -> ContentRecord {
        ContentRecord::new()
            .with("ID", id)
            .with("post_title", title)
            .with("post_name", title.to_lowercase().replace(' ', "-"))
            .with("post_type", "post")
            .with("post_status", "publish")
    }

    pub fn page(id: u64, title: &str, parent: u64, menu_order: u64) -> ContentRecord {
        ContentRecord::new()
            .with("ID", id)
            .with("post_title", title)
            .with("post_type", "page")
            .with("post_status", "publish")
            .with("post_parent", parent)
            .with("menu_order", menu_order)
    }

    pub fn category(id: u64, name: &str, parent: u64) -> ContentRecord {
        ContentRecord::new()
            .with("cat_ID", id)
            .with("term_id", id)
            .with("cat_name", name)
            .with("slug", name.to_lowercase())
            .with("parent", parent)
    }

    pub fn term(id: u64, name: &str, taxonomy: &str, count: u64) -> ContentRecord {
        ContentRecord::new()
            .with("term_id", id)
            .with("name", name)
            .with("slug", name.to_lowercase())
            .with("taxonomy", taxonomy)
            .with("count", count)
    }

    pub fn menu(id: u64, name: &str) -> ContentRecord {
        ContentRecord::new()
            .with("term_id", id)
            .with("name", name)
            .with("slug", name.to_lowercase().replace(' ', "-"))
    }

    pub fn post_type(name: &str, label: &str, singular: &str) -> ContentRecord {
        ContentRecord::new()
            .with("name", name)
            .with("label", label)
            .with("singular_name", singular)
    }

    pub fn taxonomy(name: &str, label: &str, singular: &str, public: bool) -> ContentRecord {
        post_type(name, label, singular).with("public", public)
    }

    pub fn user(id: u64, display_name: &str, role: &str) -> ContentRecord {
        ContentRecord::new()
            .with("ID", id)
            .with("display_name", display_name)
            .with("user_login", display_name.to_lowercase().replace(' ', "."))
            .with("roles", serde_json::json!([role]))
    }

    /// Categories `{1 News (0), 2 Sports (0), 3 Football (2)}`.
    pub fn scenario_a_categories() -> Vec<ContentRecord> {
        vec![
            category(1, "News", 0),
            category(2, "Sports", 0),
            category(3, "Football", 2),
        ]
    }

    pub fn scenario_a_store() -> InMemoryContentStore {
        store_with(Collection::Categories, scenario_a_categories())
    }

    /// The row confirmed in the write-back scenario.
    pub fn scenario_d_row() -> ResultRow {
        ResultRow {
            key: "42".to_string(),
            title: "My Post".to_string(),
            url: "https://x/42".to_string(),
            alternate: true,
        }
    }

    /// Store holding only `records` in `collection`.
    pub fn store_with(collection: Collection, records: Vec<ContentRecord>) -> InMemoryContentStore {
        let store = InMemoryContentStore::new().with_site_url(SITE_URL);
        if let Err(err) = store.extend(collection, records) {
            panic!("fixture store rejected records: {}", err);
        }
        store
    }

    /// Full API router over [`site_store`] with default configuration.
    pub fn site_router() -> axum::Router {
        linkfield_api::create_api_router(
            linkfield_api::AppState::with_store(Arc::new(site_store())),
            &linkfield_api::ApiConfig::default(),
        )
    }

    /// A small site with every collection populated.
    pub fn site_store() -> InMemoryContentStore {
        let store = InMemoryContentStore::new().with_site_url(SITE_URL);
        let seed: Vec<(Collection, Vec<ContentRecord>)> = vec![
            (
                Collection::Posts,
                vec![
                    post(1, "Hello World"),
                    post(2, "Rust Notes"),
                    post(3, "Hello Again"),
                    page(10, "About", 0, 2),
                    page(11, "Contact", 0, 1),
                    page(12, "Team", 10, 0),
                ],
            ),
            (Collection::Categories, scenario_a_categories()),
            (Collection::Menus, vec![menu(20, "Main Menu"), menu(21, "Footer")]),
            (
                Collection::PostTypes,
                vec![
                    post_type("post", "Posts", "Post"),
                    post_type("page", "Pages", "Page"),
                    post_type("book", "Books", "Book"),
                ],
            ),
            (
                Collection::Taxonomies,
                vec![
                    taxonomy("category", "Categories", "Category", true),
                    taxonomy("post_tag", "Tags", "Tag", true),
                    taxonomy("nav_menu", "Navigation Menus", "Navigation Menu", false),
                ],
            ),
            (
                Collection::Terms,
                vec![
                    term(30, "rust", "post_tag", 2),
                    term(31, "web", "post_tag", 1),
                    term(32, "unused", "post_tag", 0),
                ],
            ),
            (
                Collection::Users,
                vec![
                    user(1, "Ada Lovelace", "administrator"),
                    user(2, "Grace Hopper", "editor"),
                ],
            ),
        ];
        for (collection, records) in seed {
            if let Err(err) = store.extend(collection, records) {
                panic!("fixture store rejected records: {}", err);
            }
        }
        if let Err(err) = store.attach_tags(2, [30, 31]) {
            panic!("fixture store rejected tags: {}", err);
        }
        store
    }
}

// ============================================================================
// ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Custom assertions for LINKFIELD-specific validation.

    use super::*;
    use scraper::{Html, Selector};
    use std::collections::HashSet;

    fn selector(css: &str) -> Selector {
        match Selector::parse(css) {
            Ok(selector) => selector,
            Err(err) => panic!("invalid selector {:?}: {:?}", css, err),
        }
    }

    /// Assert that rendered markup holds exactly one radio per result, in
    /// order, with unique values equal to the result keys.
    #[track_caller]
    pub fn assert_radio_per_result(html: &str, results: &ResultSet) {
        let document = Html::parse_fragment(html);
        let radios = selector(r#"input[type="radio"]"#);
        let values: Vec<String> = document
            .select(&radios)
            .map(|input| input.value().attr("value").unwrap_or_default().to_string())
            .collect();

        assert_eq!(values.len(), results.len(), "one radio per result");
        let unique: HashSet<&String> = values.iter().collect();
        assert_eq!(unique.len(), values.len(), "radio values must be unique");
        let keys: Vec<&str> = results.keys().collect();
        assert_eq!(values.iter().map(String::as_str).collect::<Vec<_>>(), keys);
    }

    /// Assert that every category title carries one `"- "` per level below
    /// the root it was listed from.
    #[track_caller]
    pub fn assert_depth_prefixes(results: &ResultSet, categories: &[ContentRecord]) {
        let parent_of = |id: &str| -> Option<String> {
            categories
                .iter()
                .find(|c| c.text_or_empty("cat_ID") == id)
                .map(|c| c.text_or_empty("parent"))
        };

        for result in results.iter() {
            let mut depth = 0;
            let mut cursor = parent_of(&result.key);
            while let Some(parent) = cursor.filter(|p| p != "0") {
                depth += 1;
                cursor = parent_of(&parent);
            }
            let expected = "- ".repeat(depth);
            assert!(
                result.title.starts_with(&expected) && !result.title[expected.len()..].starts_with("- "),
                "category {} at depth {} has title {:?}",
                result.key,
                depth,
                result.title
            );
        }
    }

    /// Assert an unsuccessful envelope carrying `message`.
    #[track_caller]
    pub fn assert_failure(response: &SearchResponse, message: &str) {
        assert!(!response.success, "expected failure, got {:?}", response);
        assert_eq!(response.message(), Some(message));
    }
}
