//! Page Repository

use async_trait::async_trait;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, PageStore, RepoError, RepoResult};
use crate::db::models::{Page, PageCreate, PageStatus, PageSummary};
use crate::utils::time::now_millis;

const PAGE_TABLE: &str = "page";

#[derive(Clone)]
pub struct PageRepository {
    base: BaseRepository,
}

impl PageRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a new page definition
    pub async fn create(&self, tenant: &str, data: PageCreate) -> RepoResult<Page> {
        let now = now_millis();
        let page = Page {
            id: None,
            tenant: tenant.to_string(),
            title: data.title,
            slug: data.slug,
            status: data.status.unwrap_or(PageStatus::Draft),
            sections: data.sections.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        let created: Option<Page> = self.base.db().create(PAGE_TABLE).content(page).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create page".to_string()))
    }

    /// Find a page by slug within a tenant
    pub async fn find_by_slug(&self, tenant: &str, slug: &str) -> RepoResult<Option<Page>> {
        let pages: Vec<Page> = self
            .base
            .db()
            .query("SELECT * FROM page WHERE tenant = $tenant AND slug = $slug LIMIT 1")
            .bind(("tenant", tenant.to_string()))
            .bind(("slug", slug.to_string()))
            .await?
            .take(0)?;
        Ok(pages.into_iter().next())
    }
}

#[async_trait]
impl PageStore for PageRepository {
    async fn list_published(&self, tenant: &str) -> RepoResult<Vec<PageSummary>> {
        let summaries: Vec<PageSummary> = self
            .base
            .db()
            .query("SELECT title, slug FROM page WHERE tenant = $tenant AND status = $status ORDER BY title")
            .bind(("tenant", tenant.to_string()))
            .bind(("status", PageStatus::Published))
            .await?
            .take(0)?;
        Ok(summaries)
    }
}
