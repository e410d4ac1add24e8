//! In-memory content store for tests and the demo server.

use crate::fixture::StoreFixture;
use crate::query::{self, Collection};
use crate::{ContentStore, LinkTarget, StoreResult, DEFAULT_MAX_RESULTS};
use async_trait::async_trait;
use linkfield_core::{ContentRecord, QueryArgs, StoreError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use tracing::debug;

/// In-memory content store.
///
/// Records keep their insertion order, which is the "natural order" listings
/// return when the query names no ordering.
#[derive(Debug)]
pub struct InMemoryContentStore {
    collections: Arc<RwLock<HashMap<Collection, Vec<ContentRecord>>>>,
    object_tags: Arc<RwLock<HashMap<u64, Vec<u64>>>>,
    site_url: String,
    max_results: usize,
    calls: AtomicUsize,
}

impl Default for InMemoryContentStore {
    fn default() -> Self {
        Self {
            collections: Arc::default(),
            object_tags: Arc::default(),
            site_url: "http://localhost".to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            calls: AtomicUsize::new(0),
        }
    }
}

impl InMemoryContentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded from a fixture.
    pub fn from_fixture(fixture: StoreFixture) -> StoreResult<Self> {
        let mut store = Self::new();
        if let Some(site_url) = fixture.site_url.clone() {
            store = store.with_site_url(site_url);
        }
        for (collection, records) in fixture.collections() {
            store.extend(collection, records)?;
        }
        for (object_id, term_ids) in fixture.object_tags {
            store.attach_tags(object_id, term_ids)?;
        }
        Ok(store)
    }

    pub fn with_site_url(mut self, site_url: impl Into<String>) -> Self {
        self.site_url = site_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Append one record to a collection.
    pub fn insert(&self, collection: Collection, record: ContentRecord) -> StoreResult<()> {
        self.extend(collection, std::iter::once(record))
    }

    /// Append records to a collection, preserving their order.
    pub fn extend<I>(&self, collection: Collection, records: I) -> StoreResult<()>
    where
        I: IntoIterator<Item = ContentRecord>,
    {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        collections.entry(collection).or_default().extend(records);
        Ok(())
    }

    /// Attach tag term ids to an object (post) id.
    pub fn attach_tags<I>(&self, object_id: u64, term_ids: I) -> StoreResult<()>
    where
        I: IntoIterator<Item = u64>,
    {
        let mut object_tags = self
            .object_tags
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        object_tags.entry(object_id).or_default().extend(term_ids);
        Ok(())
    }

    /// Clear all stored data.
    pub fn clear(&self) -> StoreResult<()> {
        self.collections
            .write()
            .map_err(|_| StoreError::LockPoisoned)?
            .clear();
        self.object_tags
            .write()
            .map_err(|_| StoreError::LockPoisoned)?
            .clear();
        Ok(())
    }

    /// Number of records held in a collection.
    pub fn count(&self, collection: Collection) -> StoreResult<usize> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        Ok(collections.get(&collection).map(Vec::len).unwrap_or(0))
    }

    /// Number of listing calls served so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn list(&self, collection: Collection, args: &QueryArgs) -> StoreResult<Vec<ContentRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        let records = collections
            .get(&collection)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let listed = query::run(collection, records, args, self.max_results)?;
        debug!(
            collection = %collection,
            matched = listed.len(),
            "Listed content records"
        );
        Ok(listed)
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn posts(&self, args: &QueryArgs) -> StoreResult<Vec<ContentRecord>> {
        self.list(Collection::Posts, args)
    }

    async fn categories(&self, args: &QueryArgs) -> StoreResult<Vec<ContentRecord>> {
        self.list(Collection::Categories, args)
    }

    async fn nav_menus(&self, args: &QueryArgs) -> StoreResult<Vec<ContentRecord>> {
        self.list(Collection::Menus, args)
    }

    async fn post_types(&self, args: &QueryArgs) -> StoreResult<Vec<ContentRecord>> {
        self.list(Collection::PostTypes, args)
    }

    async fn tags_for(&self, object_id: u64) -> StoreResult<Vec<ContentRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if object_id == 0 {
            return Ok(Vec::new());
        }

        let term_ids = {
            let object_tags = self
                .object_tags
                .read()
                .map_err(|_| StoreError::LockPoisoned)?;
            object_tags.get(&object_id).cloned().unwrap_or_default()
        };

        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        let terms = collections
            .get(&Collection::Terms)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        Ok(term_ids
            .iter()
            .filter_map(|term_id| {
                terms
                    .iter()
                    .find(|term| term.number("term_id") == Some(*term_id))
                    .cloned()
            })
            .collect())
    }

    async fn taxonomies(&self, args: &QueryArgs) -> StoreResult<Vec<ContentRecord>> {
        self.list(Collection::Taxonomies, args)
    }

    async fn terms(&self, args: &QueryArgs) -> StoreResult<Vec<ContentRecord>> {
        self.list(Collection::Terms, args)
    }

    async fn users(&self, args: &QueryArgs) -> StoreResult<Vec<ContentRecord>> {
        self.list(Collection::Users, args)
    }

    fn link(&self, target: &LinkTarget) -> String {
        let site = &self.site_url;
        match target {
            LinkTarget::Post(id) => format!("{}/?p={}", site, id),
            LinkTarget::Page(id) => format!("{}/?page_id={}", site, id),
            LinkTarget::Category(id) => format!("{}/?cat={}", site, id),
            LinkTarget::Term(id) => format!("{}/?term_id={}", site, id),
            LinkTarget::EditUser(id) => format!("{}/wp-admin/user-edit.php?user_id={}", site, id),
            LinkTarget::Admin(path) => format!("{}/wp-admin/{}", site, path.trim_start_matches('/')),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
