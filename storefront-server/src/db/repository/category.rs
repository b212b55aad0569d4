//! Category Repository

use async_trait::async_trait;
use serde::Deserialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, TaxonomyStore, record_id};
use crate::db::models::{Category, CategoryCreate};

const CATEGORY_TABLE: &str = "category";

#[derive(Clone)]
pub struct CategoryRepository {
    base: BaseRepository,
}

impl CategoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a new category
    pub async fn create(&self, tenant: &str, data: CategoryCreate) -> RepoResult<Category> {
        let category = Category {
            id: None,
            tenant: tenant.to_string(),
            name: data.name,
            slug: data.slug,
            image: data.image.unwrap_or_default(),
            sort_order: data.sort_order.unwrap_or(0),
            is_active: true,
        };
        let created: Option<Category> = self
            .base
            .db()
            .create(CATEGORY_TABLE)
            .content(category)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create category".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct CountRow {
    count: u64,
}

#[async_trait]
impl TaxonomyStore for CategoryRepository {
    async fn list_categories(&self, tenant: &str) -> RepoResult<Vec<Category>> {
        let categories: Vec<Category> = self
            .base
            .db()
            .query("SELECT * FROM category WHERE tenant = $tenant AND is_active = true ORDER BY sort_order")
            .bind(("tenant", tenant.to_string()))
            .await?
            .take(0)?;
        Ok(categories)
    }

    async fn find_categories_by_ids(
        &self,
        tenant: &str,
        ids: &[String],
    ) -> RepoResult<Vec<Category>> {
        let ids: Vec<surrealdb::RecordId> = ids
            .iter()
            .map(|id| record_id(CATEGORY_TABLE, id))
            .collect();
        let categories: Vec<Category> = self
            .base
            .db()
            .query("SELECT * FROM category WHERE tenant = $tenant AND is_active = true AND id IN $ids ORDER BY sort_order")
            .bind(("tenant", tenant.to_string()))
            .bind(("ids", ids))
            .await?
            .take(0)?;
        Ok(categories)
    }

    async fn count_products(&self, tenant: &str, category_id: &str) -> RepoResult<u64> {
        let rows: Vec<CountRow> = self
            .base
            .db()
            .query("SELECT count() FROM product WHERE tenant = $tenant AND category = $category AND is_active = true GROUP ALL")
            .bind(("tenant", tenant.to_string()))
            .bind(("category", category_id.to_string()))
            .await?
            .take(0)?;
        Ok(rows.into_iter().next().map(|row| row.count).unwrap_or(0))
    }
}
