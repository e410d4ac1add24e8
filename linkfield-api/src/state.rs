//! Shared application state for Axum routers.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use linkfield_core::{Catalog, ContentTypeRegistry, Translate};
use linkfield_resolver::ContentResolver;
use linkfield_store::{ContentStore, InMemoryContentStore, StoreFixture};
use tracing::info;

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};

/// Application-wide state shared across all routes. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<ContentResolver>,
    pub translator: Arc<dyn Translate>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(resolver: ContentResolver, translator: Arc<dyn Translate>) -> Self {
        Self {
            resolver: Arc::new(resolver),
            translator,
            start_time: Instant::now(),
        }
    }

    /// State over any store, with every type enabled and English texts.
    pub fn with_store(store: Arc<dyn ContentStore>) -> Self {
        Self::new(
            ContentResolver::new(store, ContentTypeRegistry::standard()),
            Arc::new(Catalog::english()),
        )
    }

    /// State for the server binary: in-memory store seeded from the
    /// configured fixture, registry restricted to the enabled types.
    pub fn from_config(config: &ApiConfig) -> ApiResult<Self> {
        let registry = config.registry()?;

        let store = match &config.fixture_path {
            Some(path) => load_fixture(path)?,
            None => InMemoryContentStore::new(),
        }
        .with_max_results(config.max_results);

        info!(
            types = ?registry.kinds().collect::<Vec<_>>(),
            max_results = config.max_results,
            fixture = ?config.fixture_path,
            "Content store ready"
        );

        Ok(Self::new(
            ContentResolver::new(Arc::new(store), registry),
            Arc::new(Catalog::english()),
        ))
    }
}

fn load_fixture(path: &Path) -> ApiResult<InMemoryContentStore> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        ApiError::config_error(format!("Failed to read fixture {}: {}", path.display(), e))
    })?;
    let fixture = StoreFixture::from_json(&raw).map_err(|e| {
        ApiError::config_error(format!("Invalid fixture {}: {}", path.display(), e))
    })?;
    Ok(InMemoryContentStore::from_fixture(fixture)?)
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("resolver", &self.resolver)
            .field("start_time", &self.start_time)
            .finish()
    }
}
