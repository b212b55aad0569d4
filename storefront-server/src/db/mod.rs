//! Database Module
//!
//! Embedded SurrealDB behind a thin service struct. Tables stay schemaless;
//! only the hot tenant-scoped lookups get indexes.

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

/// Database service, owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database at `db_path`
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        Self::prepare(&db).await?;
        tracing::info!("Database ready at {db_path}");
        Ok(Self { db })
    }

    /// In-memory database (tests, throwaway environments)
    pub async fn memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
        Self::prepare(&db).await?;
        Ok(Self { db })
    }

    async fn prepare(db: &Surreal<Db>) -> Result<(), AppError> {
        db.use_ns("storefront")
            .use_db("main")
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;
        Self::define_schema(db).await
    }

    async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
        db.query(
            "DEFINE INDEX IF NOT EXISTS product_tenant ON TABLE product COLUMNS tenant;
             DEFINE INDEX IF NOT EXISTS category_tenant ON TABLE category COLUMNS tenant;
             DEFINE INDEX IF NOT EXISTS location_tenant ON TABLE location COLUMNS tenant;
             DEFINE INDEX IF NOT EXISTS page_tenant_slug ON TABLE page COLUMNS tenant, slug;
             DEFINE INDEX IF NOT EXISTS smart_rule_tenant ON TABLE smart_rule COLUMNS tenant;",
        )
        .await
        .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?
        .check()
        .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;
        Ok(())
    }
}
