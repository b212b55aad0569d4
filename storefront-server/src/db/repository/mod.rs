//! Repository Module
//!
//! CRUD and query access to the SurrealDB tables, plus the store traits the
//! composition core consumes. The traits mirror the collaborator boundaries
//! of the system: the rule engine and section resolvers only ever see these,
//! never a concrete database handle, so tests can swap in in-memory fakes.

pub mod category;
pub mod location;
pub mod page;
pub mod product;
pub mod smart_rule;

// Re-exports
pub use category::CategoryRepository;
pub use location::LocationRepository;
pub use page::PageRepository;
pub use product::ProductRepository;
pub use smart_rule::SmartRuleRepository;

use async_trait::async_trait;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

use crate::db::models::{Category, PageSummary, Product, SmartRule, StoreLocation};
use crate::rules::query::ProductQuery;
use crate::utils::AppError;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Parse a `"table:key"` id, falling back to `table` for bare keys
pub(crate) fn record_id(table: &str, id: &str) -> RecordId {
    id.parse()
        .unwrap_or_else(|_| RecordId::from_table_key(table, id))
}

// =============================================================================
// Store traits (collaborator seams)
// =============================================================================

/// Catalog reads the rule engine needs
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Run a built rule query. The tenant scope is part of the query itself
    /// and is always applied.
    async fn query(&self, query: &ProductQuery) -> RepoResult<Vec<Product>>;

    /// Point lookups by id list; unknown ids are silently dropped.
    async fn find_by_ids(&self, tenant: &str, ids: &[String]) -> RepoResult<Vec<Product>>;

    /// Batched view-count increment (best effort; caller detaches it).
    async fn record_views(&self, tenant: &str, ids: &[String]) -> RepoResult<()>;
}

/// Saved-rule lookup for the rule engine
#[async_trait]
pub trait SmartRuleStore: Send + Sync {
    async fn find_by_id(&self, tenant: &str, id: &str) -> RepoResult<Option<SmartRule>>;
}

/// Category reads for category-grid sections
#[async_trait]
pub trait TaxonomyStore: Send + Sync {
    async fn list_categories(&self, tenant: &str) -> RepoResult<Vec<Category>>;

    async fn find_categories_by_ids(
        &self,
        tenant: &str,
        ids: &[String],
    ) -> RepoResult<Vec<Category>>;

    /// Live product count for one category. The expensive part of a category
    /// grid; callers only ask for it when the section config opts in.
    async fn count_products(&self, tenant: &str, category_id: &str) -> RepoResult<u64>;
}

/// Published-page listing for navigation merging
#[async_trait]
pub trait PageStore: Send + Sync {
    async fn list_published(&self, tenant: &str) -> RepoResult<Vec<PageSummary>>;
}

/// Store locations for location sections
#[async_trait]
pub trait LocationStore: Send + Sync {
    async fn list_locations(&self, tenant: &str) -> RepoResult<Vec<StoreLocation>>;
}
