use super::{flat_results, StrategyContext, TypeStrategy};
use async_trait::async_trait;
use linkfield_core::{ContentKind, QueryArgs, ResolveError, ResultSet};
use linkfield_store::LinkTarget;

/// Tags attached to the object named by the `ID` setting.
///
/// Tag listings ignore the search term.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagStrategy;

#[async_trait]
impl TypeStrategy for TagStrategy {
    fn kind(&self) -> ContentKind {
        ContentKind::Tag
    }

    fn natural_id(&self) -> &'static str {
        "term_id"
    }

    fn default_query(&self) -> QueryArgs {
        QueryArgs::new().with("ID", 0)
    }

    async fn resolve(&self, ctx: &StrategyContext<'_>) -> Result<ResultSet, ResolveError> {
        let args = ctx.query(self.default_query());
        let object_id = args.get_u64("ID").unwrap_or(0);

        let records = ctx.store.tags_for(object_id).await?;
        Ok(flat_results(
            ctx,
            records,
            self.natural_id(),
            |record| record.text_or_empty("name"),
            LinkTarget::Term,
        ))
    }
}
