use super::{flat_results, StrategyContext, TypeStrategy};
use async_trait::async_trait;
use linkfield_core::{ContentKind, QueryArgs, ResolveError, ResultSet};
use linkfield_store::LinkTarget;

#[derive(Debug, Clone, Copy, Default)]
pub struct TermStrategy;

#[async_trait]
impl TypeStrategy for TermStrategy {
    fn kind(&self) -> ContentKind {
        ContentKind::Term
    }

    fn natural_id(&self) -> &'static str {
        "term_id"
    }

    fn default_query(&self) -> QueryArgs {
        QueryArgs::new().with("hide_empty", false)
    }

    async fn resolve(&self, ctx: &StrategyContext<'_>) -> Result<ResultSet, ResolveError> {
        let mut args = ctx.query(self.default_query());
        if ctx.has_search() {
            args.insert("search", ctx.search);
        }

        let records = ctx.store.terms(&args).await?;
        Ok(flat_results(
            ctx,
            records,
            self.natural_id(),
            |record| record.text_or_empty("name"),
            LinkTarget::Term,
        ))
    }
}
