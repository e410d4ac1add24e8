use super::{flat_results, StrategyContext, TypeStrategy};
use async_trait::async_trait;
use linkfield_core::{ContentKind, QueryArgs, ResolveError, ResultSet};
use linkfield_store::LinkTarget;

/// Users of any role unless `role` is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserStrategy;

#[async_trait]
impl TypeStrategy for UserStrategy {
    fn kind(&self) -> ContentKind {
        ContentKind::User
    }

    fn natural_id(&self) -> &'static str {
        "ID"
    }

    fn default_query(&self) -> QueryArgs {
        QueryArgs::new().with("role", "")
    }

    async fn resolve(&self, ctx: &StrategyContext<'_>) -> Result<ResultSet, ResolveError> {
        let mut args = ctx.query(self.default_query());
        if ctx.has_search() {
            args.insert("search", ctx.search);
        }

        let records = ctx.store.users(&args).await?;
        Ok(flat_results(
            ctx,
            records,
            self.natural_id(),
            |record| record.text_or_empty("display_name"),
            LinkTarget::EditUser,
        ))
    }
}
