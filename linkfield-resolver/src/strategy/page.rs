use super::{flat_results, StrategyContext, TypeStrategy};
use async_trait::async_trait;
use linkfield_core::{ContentKind, QueryArgs, ResolveError, ResultSet};
use linkfield_store::LinkTarget;

/// Pages, ordered by parent then menu order. The post type is always `page`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageStrategy;

#[async_trait]
impl TypeStrategy for PageStrategy {
    fn kind(&self) -> ContentKind {
        ContentKind::Page
    }

    fn natural_id(&self) -> &'static str {
        "ID"
    }

    fn default_query(&self) -> QueryArgs {
        QueryArgs::new().with("sort_column", "post_parent,menu_order")
    }

    async fn resolve(&self, ctx: &StrategyContext<'_>) -> Result<ResultSet, ResolveError> {
        let mut args = ctx.query(self.default_query());
        args.insert("post_type", "page");
        if ctx.has_search() {
            args.insert("s", ctx.search);
        }

        let records = ctx.store.posts(&args).await?;
        Ok(flat_results(
            ctx,
            records,
            self.natural_id(),
            |record| record.text_or_empty("post_title"),
            LinkTarget::Page,
        ))
    }
}
