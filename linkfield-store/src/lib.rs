//! LINKFIELD Store - Content Store Trait and In-Memory Implementation
//!
//! Defines the content-query primitives the resolver lists from.
//! A CMS-backed implementation lives in the host; this crate only ships
//! the in-memory store used by tests and the demo server.

pub mod fixture;
pub mod memory;
mod query;

pub use fixture::StoreFixture;
pub use memory::InMemoryContentStore;
pub use query::Collection;

use async_trait::async_trait;
use linkfield_core::{ContentRecord, QueryArgs, StoreError};
use std::fmt;

/// Default page size when a query names neither `number` nor `posts_per_page`.
pub const DEFAULT_MAX_RESULTS: usize = 50;

pub type StoreResult<T> = Result<T, StoreError>;

// ============================================================================
// LINK TARGETS
// ============================================================================

/// Something the store can build a URL for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// Public permalink of a post
    Post(String),
    /// Public link of a page
    Page(String),
    /// Archive link of a category
    Category(String),
    /// Archive link of any term (tags included)
    Term(String),
    /// Admin screen editing a user
    EditUser(String),
    /// Admin screen path, query string included (`nav-menus.php?menu=3`)
    Admin(String),
}

impl fmt::Display for LinkTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkTarget::Post(id) => write!(f, "post:{}", id),
            LinkTarget::Page(id) => write!(f, "page:{}", id),
            LinkTarget::Category(id) => write!(f, "category:{}", id),
            LinkTarget::Term(id) => write!(f, "term:{}", id),
            LinkTarget::EditUser(id) => write!(f, "user:{}", id),
            LinkTarget::Admin(path) => write!(f, "admin:{}", path),
        }
    }
}

// ============================================================================
// STORE TRAIT
// ============================================================================

/// Content-query primitives.
///
/// Every listing takes the already-merged query arguments and returns raw
/// records in the store's natural order. Implementations interpret the keys
/// they understand and ignore the rest.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Posts of any post type (`post_type`, `post_status`, `s`, ...).
    async fn posts(&self, args: &QueryArgs) -> StoreResult<Vec<ContentRecord>>;

    /// Categories (`parent`, `search`, `hide_empty`, `orderby`, ...).
    async fn categories(&self, args: &QueryArgs) -> StoreResult<Vec<ContentRecord>>;

    /// Navigation menus.
    async fn nav_menus(&self, args: &QueryArgs) -> StoreResult<Vec<ContentRecord>>;

    /// Registered post types.
    async fn post_types(&self, args: &QueryArgs) -> StoreResult<Vec<ContentRecord>>;

    /// Tags attached to one object. `0` means none.
    async fn tags_for(&self, object_id: u64) -> StoreResult<Vec<ContentRecord>>;

    /// Registered taxonomies.
    async fn taxonomies(&self, args: &QueryArgs) -> StoreResult<Vec<ContentRecord>>;

    /// Terms of any taxonomy.
    async fn terms(&self, args: &QueryArgs) -> StoreResult<Vec<ContentRecord>>;

    /// Users (`role`, `search`, ...).
    async fn users(&self, args: &QueryArgs) -> StoreResult<Vec<ContentRecord>>;

    /// URL for a link target.
    fn link(&self, target: &LinkTarget) -> String;
}
