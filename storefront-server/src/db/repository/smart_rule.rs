//! Smart Rule Repository

use async_trait::async_trait;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, SmartRuleStore, record_id};
use crate::db::models::{SmartRule, SmartRuleCreate, SmartRuleUpdate};
use crate::utils::time::now_millis;

const SMART_RULE_TABLE: &str = "smart_rule";

#[derive(Clone)]
pub struct SmartRuleRepository {
    base: BaseRepository,
}

impl SmartRuleRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// List all rules for a tenant
    pub async fn list(&self, tenant: &str) -> RepoResult<Vec<SmartRule>> {
        let rules: Vec<SmartRule> = self
            .base
            .db()
            .query("SELECT * FROM smart_rule WHERE tenant = $tenant ORDER BY name")
            .bind(("tenant", tenant.to_string()))
            .await?
            .take(0)?;
        Ok(rules)
    }

    /// Create a new rule (validated by the caller via the Filter Validator)
    pub async fn create(&self, tenant: &str, data: SmartRuleCreate) -> RepoResult<SmartRule> {
        let rule = SmartRule {
            id: None,
            tenant: tenant.to_string(),
            name: data.name,
            description: data.description,
            config: data.config,
            is_active: data.is_active.unwrap_or(true),
            created_at: now_millis(),
        };
        let created: Option<SmartRule> = self
            .base
            .db()
            .create(SMART_RULE_TABLE)
            .content(rule)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create smart rule".to_string()))
    }

    /// Find a rule by id within a tenant
    pub async fn find(&self, tenant: &str, id: &str) -> RepoResult<Option<SmartRule>> {
        self.fetch(tenant, id).await
    }

    /// Update a rule within a tenant
    pub async fn update(
        &self,
        tenant: &str,
        id: &str,
        data: SmartRuleUpdate,
    ) -> RepoResult<SmartRule> {
        let Some(mut rule) = self.fetch(tenant, id).await? else {
            return Err(RepoError::NotFound(format!("Smart rule {id} not found")));
        };

        if let Some(name) = data.name {
            rule.name = name;
        }
        if data.description.is_some() {
            rule.description = data.description;
        }
        if let Some(config) = data.config {
            rule.config = config;
        }
        if let Some(is_active) = data.is_active {
            rule.is_active = is_active;
        }

        let record = rule
            .id
            .take()
            .ok_or_else(|| RepoError::Database("Fetched rule carries no id".to_string()))?;
        let updated: Option<SmartRule> = self.base.db().update(record).content(rule).await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Smart rule {id} not found")))
    }

    /// Delete a rule within a tenant
    pub async fn delete(&self, tenant: &str, id: &str) -> RepoResult<()> {
        let Some(rule) = self.fetch(tenant, id).await? else {
            return Err(RepoError::NotFound(format!("Smart rule {id} not found")));
        };
        let record = rule
            .id
            .ok_or_else(|| RepoError::Database("Fetched rule carries no id".to_string()))?;
        let _deleted: Option<SmartRule> = self.base.db().delete(record).await?;
        Ok(())
    }

    async fn fetch(&self, tenant: &str, id: &str) -> RepoResult<Option<SmartRule>> {
        let record = record_id(SMART_RULE_TABLE, id);
        let rules: Vec<SmartRule> = self
            .base
            .db()
            .query("SELECT * FROM smart_rule WHERE id = $id AND tenant = $tenant")
            .bind(("id", record))
            .bind(("tenant", tenant.to_string()))
            .await?
            .take(0)?;
        Ok(rules.into_iter().next())
    }
}

#[async_trait]
impl SmartRuleStore for SmartRuleRepository {
    async fn find_by_id(&self, tenant: &str, id: &str) -> RepoResult<Option<SmartRule>> {
        self.fetch(tenant, id).await
    }
}
