use super::{flat_results, labelled_name, StrategyContext, TypeStrategy};
use async_trait::async_trait;
use linkfield_core::{ContentKind, QueryArgs, ResolveError, ResultSet};
use linkfield_store::LinkTarget;

/// Public taxonomies, matched on `name` or `singular_name`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaxonomyStrategy;

#[async_trait]
impl TypeStrategy for TaxonomyStrategy {
    fn kind(&self) -> ContentKind {
        ContentKind::Taxonomy
    }

    fn natural_id(&self) -> &'static str {
        "name"
    }

    fn default_query(&self) -> QueryArgs {
        QueryArgs::new().with("public", 1)
    }

    async fn resolve(&self, ctx: &StrategyContext<'_>) -> Result<ResultSet, ResolveError> {
        let mut args = ctx.query(self.default_query());
        if ctx.has_search() {
            args.insert("name", ctx.search);
            args.insert("singular_name", ctx.search);
        }

        let records = ctx.store.taxonomies(&args).await?;
        Ok(flat_results(
            ctx,
            records,
            self.natural_id(),
            labelled_name,
            |name| LinkTarget::Admin(format!("edit-tags.php?taxonomy={}", name)),
        ))
    }
}
