//! LINKFIELD Resolver - Content Type Dispatch
//!
//! Maps a logical content type to its listing strategy and turns the
//! store's records into an ordered, key-unique [`ResultSet`].

pub mod strategy;

pub use strategy::{standard_strategies, StrategyContext, TypeStrategy};

use linkfield_core::{ContentKind, ContentTypeRegistry, QueryArgs, ResolveError, ResultSet};
use linkfield_store::ContentStore;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Settings value asking to exclude the item currently being edited.
pub const EXCLUDE_CURRENT: &str = "current";

/// One resolution request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolveRequest {
    /// Sanitized search term, possibly empty
    pub search: String,
    /// Caller settings passed through to the store
    pub settings: QueryArgs,
    /// Attribute used as result key; empty means the natural identifier
    pub value_field: Option<String>,
    /// Id of the content currently being edited
    pub current: Option<String>,
}

impl ResolveRequest {
    pub fn new(search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            ..Default::default()
        }
    }

    pub fn with_settings(mut self, settings: QueryArgs) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_value_field(mut self, field: impl Into<String>) -> Self {
        self.value_field = Some(field.into());
        self
    }

    pub fn with_current(mut self, current: impl Into<String>) -> Self {
        self.current = Some(current.into());
        self
    }

    /// Settings with `exclude = "current"` replaced by the current id, or
    /// dropped when there is none.
    pub fn effective_settings(&self) -> QueryArgs {
        let mut settings = self.settings.clone();
        if settings.get("exclude").and_then(Value::as_str) == Some(EXCLUDE_CURRENT) {
            match self.current.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
                Some(current) => settings.insert("exclude", current),
                None => {
                    settings.remove("exclude");
                }
            }
        }
        settings
    }
}

/// Strategy registry keyed by content kind. Built once, then shared.
pub struct ContentResolver {
    store: Arc<dyn ContentStore>,
    registry: ContentTypeRegistry,
    strategies: HashMap<ContentKind, Arc<dyn TypeStrategy>>,
}

impl ContentResolver {
    /// Resolver with the built-in strategy for every enabled kind.
    pub fn new(store: Arc<dyn ContentStore>, registry: ContentTypeRegistry) -> Self {
        let strategies = standard_strategies()
            .into_iter()
            .filter(|strategy| registry.is_enabled(strategy.kind()))
            .map(|strategy| (strategy.kind(), strategy))
            .collect();

        Self {
            store,
            registry,
            strategies,
        }
    }

    /// Replace the strategy registered for its kind.
    pub fn with_strategy(mut self, strategy: Arc<dyn TypeStrategy>) -> Self {
        self.strategies.insert(strategy.kind(), strategy);
        self
    }

    pub fn registry(&self) -> &ContentTypeRegistry {
        &self.registry
    }

    pub fn store(&self) -> &Arc<dyn ContentStore> {
        &self.store
    }

    /// Normalize an alias, falling back to the registry default.
    pub fn kind_for(&self, content_type: &str) -> Result<ContentKind, ResolveError> {
        self.registry.normalize(content_type)
    }

    /// Resolve a type alias.
    pub async fn resolve(
        &self,
        content_type: &str,
        request: &ResolveRequest,
    ) -> Result<ResultSet, ResolveError> {
        let kind = self.kind_for(content_type)?;
        self.resolve_kind(kind, request).await
    }

    /// Resolve an already-normalized kind.
    pub async fn resolve_kind(
        &self,
        kind: ContentKind,
        request: &ResolveRequest,
    ) -> Result<ResultSet, ResolveError> {
        let strategy = self
            .strategies
            .get(&kind)
            .ok_or_else(|| ResolveError::MissingStrategy {
                kind: kind.to_string(),
            })?;

        let settings = request.effective_settings();
        let ctx = StrategyContext {
            store: self.store.as_ref(),
            search: request.search.as_str(),
            settings: &settings,
            value_field: request.value_field.as_deref(),
        };

        let results = strategy.resolve(&ctx).await?;
        debug!(
            kind = %kind,
            search = %request.search,
            results = results.len(),
            "Resolved content"
        );
        Ok(results)
    }
}

impl std::fmt::Debug for ContentResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<ContentKind> = self.strategies.keys().copied().collect();
        kinds.sort();
        f.debug_struct("ContentResolver")
            .field("registry", &self.registry)
            .field("strategies", &kinds)
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
