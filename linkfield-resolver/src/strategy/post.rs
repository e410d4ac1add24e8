use super::{flat_results, StrategyContext, TypeStrategy};
use async_trait::async_trait;
use linkfield_core::{ContentKind, QueryArgs, ResolveError, ResultSet};
use linkfield_store::LinkTarget;

/// Published posts, searched through `s`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostStrategy;

#[async_trait]
impl TypeStrategy for PostStrategy {
    fn kind(&self) -> ContentKind {
        ContentKind::Post
    }

    fn natural_id(&self) -> &'static str {
        "ID"
    }

    fn default_query(&self) -> QueryArgs {
        QueryArgs::new()
            .with("post_type", "post")
            .with("post_status", "publish")
    }

    async fn resolve(&self, ctx: &StrategyContext<'_>) -> Result<ResultSet, ResolveError> {
        let mut args = ctx.query(self.default_query());
        if ctx.has_search() {
            args.insert("s", ctx.search);
        }

        let records = ctx.store.posts(&args).await?;
        Ok(flat_results(
            ctx,
            records,
            self.natural_id(),
            |record| record.text_or_empty("post_title"),
            LinkTarget::Post,
        ))
    }
}
