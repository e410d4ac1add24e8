//! Per-kind listing strategies.
//!
//! Each strategy owns its default query, the search argument it sets, and
//! how a raw record becomes a [`SearchResult`].

mod category;
mod menu;
mod page;
mod post;
mod post_type;
mod tag;
mod taxonomy;
mod term;
mod user;

pub use category::CategoryStrategy;
pub use menu::MenuStrategy;
pub use page::PageStrategy;
pub use post::PostStrategy;
pub use post_type::PostTypeStrategy;
pub use tag::TagStrategy;
pub use taxonomy::TaxonomyStrategy;
pub use term::TermStrategy;
pub use user::UserStrategy;

use async_trait::async_trait;
use linkfield_core::{ContentKind, ContentRecord, QueryArgs, ResolveError, ResultSet, SearchResult};
use linkfield_store::{ContentStore, LinkTarget};
use std::sync::Arc;
use tracing::debug;

/// Inputs shared by every strategy for one resolution.
pub struct StrategyContext<'a> {
    pub store: &'a dyn ContentStore,
    /// Sanitized search term, possibly empty
    pub search: &'a str,
    /// Caller settings laid over the strategy defaults
    pub settings: &'a QueryArgs,
    /// Record attribute used as result key
    pub value_field: Option<&'a str>,
}

impl<'a> StrategyContext<'a> {
    /// Strategy defaults overridden by the caller's settings.
    pub fn query(&self, defaults: QueryArgs) -> QueryArgs {
        QueryArgs::merged(defaults, self.settings)
    }

    pub fn has_search(&self) -> bool {
        !self.search.is_empty()
    }

    /// Result key for a record, or `None` when its natural id is empty.
    pub fn key_for(&self, record: &ContentRecord, natural_id: &str) -> Option<String> {
        let Some(natural) = record.identifier(natural_id) else {
            debug!(natural_id, "Skipping record with empty identifier");
            return None;
        };

        Some(
            self.value_field
                .filter(|field| !field.trim().is_empty())
                .and_then(|field| record.identifier(field))
                .unwrap_or(natural),
        )
    }

    pub fn link(&self, target: LinkTarget) -> String {
        self.store.link(&target)
    }
}

/// Listing handler for one content kind.
#[async_trait]
pub trait TypeStrategy: Send + Sync {
    fn kind(&self) -> ContentKind;

    /// Attribute holding the record's own identifier.
    fn natural_id(&self) -> &'static str;

    /// Query arguments applied before caller settings.
    fn default_query(&self) -> QueryArgs;

    async fn resolve(&self, ctx: &StrategyContext<'_>) -> Result<ResultSet, ResolveError>;
}

/// The nine built-in strategies.
pub fn standard_strategies() -> Vec<Arc<dyn TypeStrategy>> {
    vec![
        Arc::new(CategoryStrategy),
        Arc::new(MenuStrategy),
        Arc::new(PageStrategy),
        Arc::new(PostStrategy),
        Arc::new(PostTypeStrategy),
        Arc::new(TagStrategy),
        Arc::new(TaxonomyStrategy),
        Arc::new(TermStrategy),
        Arc::new(UserStrategy),
    ]
}

/// Build a flat result set, skipping records without a natural id.
pub(crate) fn flat_results<T, L>(
    ctx: &StrategyContext<'_>,
    records: Vec<ContentRecord>,
    natural_id: &str,
    title: T,
    link: L,
) -> ResultSet
where
    T: Fn(&ContentRecord) -> String,
    L: Fn(String) -> LinkTarget,
{
    let mut results = ResultSet::new();
    for record in records {
        let Some(key) = ctx.key_for(&record, natural_id) else {
            continue;
        };
        let id = record.text_or_empty(natural_id);
        results.insert(SearchResult::new(key, title(&record), ctx.link(link(id))));
    }
    results
}

/// `"<label> (<name>)"` title used by registries (post types, taxonomies).
pub(crate) fn labelled_name(record: &ContentRecord) -> String {
    let name = record.text_or_empty("name");
    let label = record.text("label").unwrap_or_else(|| name.clone());
    format!("{} ({})", label, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkfield_store::InMemoryContentStore;

    fn ctx<'a>(store: &'a InMemoryContentStore, settings: &'a QueryArgs, field: Option<&'a str>) -> StrategyContext<'a> {
        StrategyContext {
            store,
            search: "",
            settings,
            value_field: field,
        }
    }

    #[test]
    fn test_key_for_prefers_value_field() {
        let store = InMemoryContentStore::new();
        let settings = QueryArgs::new();
        let record = ContentRecord::new().with("ID", 4).with("post_name", "hello");

        assert_eq!(ctx(&store, &settings, Some("post_name")).key_for(&record, "ID").as_deref(), Some("hello"));
        assert_eq!(ctx(&store, &settings, Some("missing")).key_for(&record, "ID").as_deref(), Some("4"));
        assert_eq!(ctx(&store, &settings, Some("")).key_for(&record, "ID").as_deref(), Some("4"));
        assert_eq!(ctx(&store, &settings, None).key_for(&record, "ID").as_deref(), Some("4"));
    }

    #[test]
    fn test_key_for_skips_empty_natural_id() {
        let store = InMemoryContentStore::new();
        let settings = QueryArgs::new();
        let record = ContentRecord::new().with("ID", 0).with("post_name", "ghost");
        assert_eq!(ctx(&store, &settings, Some("post_name")).key_for(&record, "ID"), None);
    }

    #[test]
    fn test_labelled_name() {
        let record = ContentRecord::new().with("name", "book").with("label", "Books");
        assert_eq!(labelled_name(&record), "Books (book)");
        let record = ContentRecord::new().with("name", "book");
        assert_eq!(labelled_name(&record), "book (book)");
    }

    #[test]
    fn test_standard_strategies_cover_every_kind() {
        let kinds: Vec<ContentKind> = standard_strategies().iter().map(|s| s.kind()).collect();
        for kind in ContentKind::ALL {
            assert!(kinds.contains(&kind), "missing strategy for {}", kind);
        }
    }
}
