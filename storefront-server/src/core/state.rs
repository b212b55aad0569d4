//! Server State
//!
//! Holds the shared service graph: database handle, rule cache, Smart Rule
//! Engine and Hydration Orchestrator. `Clone` is a shallow `Arc` copy.

use std::sync::Arc;
use std::time::Duration;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::{
    CategoryRepository, LocationRepository, PageRepository, ProductRepository,
    SmartRuleRepository,
};
use crate::rules::cache::{CacheStore, MemoryCacheStore};
use crate::rules::engine::SmartRuleEngine;
use crate::storefront::hydrator::HydrationOrchestrator;
use crate::storefront::resolver::SectionResolver;
use crate::utils::AppError;

#[derive(Clone)]
pub struct ServerState {
    /// Server configuration (immutable)
    pub config: Config,
    /// Embedded database (SurrealDB)
    pub db: Surreal<Db>,
    /// Rule execution cache (shared with handlers for invalidation)
    pub cache: Arc<dyn CacheStore>,
    /// Smart Rule Engine
    pub rule_engine: Arc<SmartRuleEngine>,
    /// Hydration Orchestrator
    pub orchestrator: Arc<HydrationOrchestrator>,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .finish()
    }
}

impl ServerState {
    /// Initialize the full state: working directory, database, services.
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::internal(format!("Failed to create work directory: {e}")))?;

        let db_path = config.database_path();
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;

        Ok(Self::from_parts(config.clone(), db_service.db))
    }

    /// Wire the service graph on top of an existing database handle.
    /// Tests use this with the in-memory engine.
    pub fn from_parts(config: Config, db: Surreal<Db>) -> Self {
        let cache: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new());

        let rule_engine = Arc::new(SmartRuleEngine::new(
            Arc::new(SmartRuleRepository::new(db.clone())),
            Arc::new(ProductRepository::new(db.clone())),
            Arc::clone(&cache),
            Duration::from_secs(config.rule_cache_ttl_secs),
        ));

        let resolver = Arc::new(SectionResolver::new(
            Arc::clone(&rule_engine),
            Arc::new(CategoryRepository::new(db.clone())),
            Arc::new(PageRepository::new(db.clone())),
            Arc::new(LocationRepository::new(db.clone())),
        ));
        let orchestrator = Arc::new(HydrationOrchestrator::new(resolver));

        Self {
            config,
            db,
            cache,
            rule_engine,
            orchestrator,
        }
    }

    /// Get the database handle
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }
}
