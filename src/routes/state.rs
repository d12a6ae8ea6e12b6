use std::sync::Arc;

use crate::{
    db::{Cache, Store},
    error::{AppError, AppResult},
    services::{
        catalog::{CatalogApi, CatalogError},
        AuthService, DailyCache, RecommendationEngine, RecommendationSettings, TextGenerator,
    },
};

pub const DEFAULT_WATCH_REGION: &str = "MX";

/// Shared application state
///
/// The catalog and everything built on it are optional: without catalog
/// credentials the store-backed routes keep working and catalog routes
/// report the missing configuration.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub auth: AuthService,
    pub cache: Cache,
    pub catalog: Option<Arc<dyn CatalogApi>>,
    pub engine: Option<Arc<RecommendationEngine>>,
    pub daily_cache: Arc<DailyCache>,
    pub watch_region: String,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, auth: AuthService) -> Self {
        Self {
            store,
            auth,
            cache: Cache::disabled(),
            catalog: None,
            engine: None,
            daily_cache: Arc::new(DailyCache::new()),
            watch_region: DEFAULT_WATCH_REGION.to_string(),
        }
    }

    /// Wires the catalog and the recommendation engine that depends on it
    pub fn with_catalog(
        mut self,
        catalog: Arc<dyn CatalogApi>,
        generator: Option<Arc<dyn TextGenerator>>,
        settings: RecommendationSettings,
    ) -> Self {
        self.engine = Some(Arc::new(RecommendationEngine::new(
            Arc::clone(&catalog),
            generator,
            settings,
        )));
        self.catalog = Some(catalog);
        self
    }

    pub fn with_cache(mut self, cache: Cache) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_watch_region(mut self, region: impl Into<String>) -> Self {
        self.watch_region = region.into();
        self
    }

    pub fn catalog(&self) -> AppResult<&Arc<dyn CatalogApi>> {
        self.catalog
            .as_ref()
            .ok_or(AppError::Catalog(CatalogError::NotConfigured))
    }

    pub fn engine(&self) -> AppResult<&RecommendationEngine> {
        self.engine
            .as_deref()
            .ok_or(AppError::Catalog(CatalogError::NotConfigured))
    }
}
