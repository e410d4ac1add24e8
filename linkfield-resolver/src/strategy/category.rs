use super::{StrategyContext, TypeStrategy};
use async_trait::async_trait;
use futures_util::future::{BoxFuture, FutureExt};
use linkfield_core::{ContentKind, ContentRecord, QueryArgs, ResolveError, ResultSet, SearchResult};
use linkfield_store::LinkTarget;
use std::collections::HashSet;

/// Depth marker prepended once per level below the root.
pub const DEPTH_PREFIX: &str = "- ";

/// Categories flattened depth-first, children right after their parent.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryStrategy;

/// Accumulator threaded through the walk.
#[derive(Debug, Default)]
struct Walk {
    results: ResultSet,
    visited: HashSet<String>,
}

/// Case-insensitive match on name or slug; an empty term matches everything.
fn matches_term(record: &ContentRecord, term: &str) -> bool {
    term.is_empty()
        || ["cat_name", "slug"].iter().any(|attr| {
            record
                .text(attr)
                .is_some_and(|value| value.to_lowercase().contains(term))
        })
}

impl CategoryStrategy {
    fn level<'a>(
        &'a self,
        ctx: &'a StrategyContext<'a>,
        base: &'a QueryArgs,
        term: &'a str,
        parent: String,
        prefix: String,
        mut walk: Walk,
    ) -> BoxFuture<'a, Result<Walk, ResolveError>> {
        async move {
            // Children are fetched unfiltered so a nested match is reachable
            // through a parent that does not match.
            let mut args = base.clone();
            args.insert("parent", parent);

            let children = ctx.store.categories(&args).await?;
            for child in children {
                let Some(key) = ctx.key_for(&child, self.natural_id()) else {
                    continue;
                };
                let id = child.text_or_empty(self.natural_id());
                // A store that ignores `parent` would otherwise loop forever.
                if !walk.visited.insert(id.clone()) {
                    continue;
                }

                if matches_term(&child, term) {
                    let title = format!("{}{}", prefix, child.text_or_empty("cat_name"));
                    let url = ctx.link(LinkTarget::Category(id.clone()));
                    walk.results.insert(SearchResult::new(key, title, url));
                }

                walk = self
                    .level(ctx, base, term, id, format!("{}{}", prefix, DEPTH_PREFIX), walk)
                    .await?;
            }
            Ok(walk)
        }
        .boxed()
    }
}

#[async_trait]
impl TypeStrategy for CategoryStrategy {
    fn kind(&self) -> ContentKind {
        ContentKind::Category
    }

    fn natural_id(&self) -> &'static str {
        "cat_ID"
    }

    fn default_query(&self) -> QueryArgs {
        QueryArgs::new()
            .with("hide_empty", 0)
            .with("orderby", "name")
            .with("order", "ASC")
            .with("parent", 0)
    }

    async fn resolve(&self, ctx: &StrategyContext<'_>) -> Result<ResultSet, ResolveError> {
        let mut base = ctx.query(self.default_query());
        let root = base.get_str("parent").unwrap_or_else(|| "0".to_string());
        base.remove("parent");
        base.remove("search");
        let term = ctx.search.to_lowercase();

        let walk = self
            .level(ctx, &base, &term, root, String::new(), Walk::default())
            .await?;
        Ok(walk.results)
    }
}
