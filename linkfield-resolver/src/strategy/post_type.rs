use super::{flat_results, labelled_name, StrategyContext, TypeStrategy};
use async_trait::async_trait;
use linkfield_core::{ContentKind, QueryArgs, ResolveError, ResultSet};
use linkfield_store::LinkTarget;

/// Registered post types, matched on `name` or `singular_name`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostTypeStrategy;

#[async_trait]
impl TypeStrategy for PostTypeStrategy {
    fn kind(&self) -> ContentKind {
        ContentKind::PostType
    }

    fn natural_id(&self) -> &'static str {
        "name"
    }

    fn default_query(&self) -> QueryArgs {
        QueryArgs::new()
    }

    async fn resolve(&self, ctx: &StrategyContext<'_>) -> Result<ResultSet, ResolveError> {
        let mut args = ctx.query(self.default_query());
        if ctx.has_search() {
            args.insert("name", ctx.search);
            args.insert("singular_name", ctx.search);
        }

        let records = ctx.store.post_types(&args).await?;
        Ok(flat_results(
            ctx,
            records,
            self.natural_id(),
            labelled_name,
            |name| LinkTarget::Admin(format!("edit.php?post_type={}", name)),
        ))
    }
}
