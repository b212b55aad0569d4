//! Smart Rule Engine
//!
//! Public entry points for rule execution:
//!
//! - [`SmartRuleEngine::execute_rule`] - saved rule by id, cache-backed
//! - [`SmartRuleEngine::execute_ad_hoc`] - inline config, validated, uncached
//! - [`SmartRuleEngine::execute_manual`] - explicit id list, no rule logic
//!
//! All three return the same [`ResolvedProduct`] representation via the one
//! shared transform. An empty result set is a normal outcome; only malformed
//! configurations and missing saved rules surface as errors.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use super::cache::CacheStore;
use super::policy::RuleTypeTable;
use super::query::RuleQueryBuilder;
use super::transform::{ResolvedProduct, resolve_products};
use super::validator::{FilterValidator, ValidationError};
use crate::db::models::{Product, RuleConfig, SmartRuleType};
use crate::db::repository::{ProductStore, RepoError, SmartRuleStore};
use crate::utils::AppError;
use crate::utils::time::now_millis;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("smart rule not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Validation(e) => AppError::Validation(e.to_string()),
            EngineError::NotFound(msg) => AppError::NotFound(msg),
            EngineError::Repo(e) => e.into(),
        }
    }
}

/// Per-execution resolution parameters. Part of the cache key, so two
/// executions with different parameters never share an entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuleParams {
    #[serde(default)]
    pub limit: Option<usize>,
}

impl RuleParams {
    fn fingerprint(&self) -> String {
        match self.limit {
            Some(limit) => format!("limit={limit}"),
            None => "default".to_string(),
        }
    }
}

/// Cache key for one saved-rule execution
pub fn rule_cache_key(tenant: &str, rule_id: &str, params: &RuleParams) -> String {
    format!("smart-rule:{tenant}:{rule_id}:{}", params.fingerprint())
}

/// Key prefix covering every cached execution of one rule (invalidation)
pub fn rule_cache_prefix(tenant: &str, rule_id: &str) -> String {
    format!("smart-rule:{tenant}:{rule_id}:")
}

/// Smart Rule Engine - resolves rules into public product DTOs
pub struct SmartRuleEngine {
    rules: Arc<dyn SmartRuleStore>,
    products: Arc<dyn ProductStore>,
    cache: Arc<dyn CacheStore>,
    validator: FilterValidator,
    builder: RuleQueryBuilder,
    cache_ttl: Duration,
}

impl std::fmt::Debug for SmartRuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmartRuleEngine")
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

impl SmartRuleEngine {
    pub fn new(
        rules: Arc<dyn SmartRuleStore>,
        products: Arc<dyn ProductStore>,
        cache: Arc<dyn CacheStore>,
        cache_ttl: Duration,
    ) -> Self {
        let table = RuleTypeTable;
        Self {
            rules,
            products,
            cache,
            validator: FilterValidator::new(table),
            builder: RuleQueryBuilder::new(table),
            cache_ttl,
        }
    }

    /// Validate a rule configuration without executing it (rule-save path)
    pub fn validate(&self, config: &RuleConfig) -> Result<(), ValidationError> {
        self.validator.validate(config)
    }

    /// Execute a saved rule. Served from cache within the TTL window; a miss
    /// runs the query and writes the result back.
    pub async fn execute_rule(
        &self,
        tenant: &str,
        rule_id: &str,
        params: &RuleParams,
    ) -> Result<Vec<ResolvedProduct>, EngineError> {
        let rule = self
            .rules
            .find_by_id(tenant, rule_id)
            .await?
            .filter(|rule| rule.is_active)
            .ok_or_else(|| EngineError::NotFound(format!("smart rule {rule_id}")))?;

        // Manual selections bypass rule logic and the cache
        if rule.config.rule_type == SmartRuleType::ManualSelection {
            return self.execute_manual(tenant, &rule.config.product_ids).await;
        }

        let key = rule_cache_key(tenant, rule_id, params);
        if let Some(hit) = self.cache_get(&key).await {
            return Ok(hit);
        }

        // Saved rules were validated when stored; only apply the overrides
        let mut config = rule.config;
        if params.limit.is_some() {
            config.limit = params.limit;
        }

        let resolved = self.run_query(tenant, &config).await?;
        self.cache_put(&key, &resolved).await;
        Ok(resolved)
    }

    /// Execute an inline, unsaved rule configuration (page-builder preview).
    /// Always validated first, never cached.
    pub async fn execute_ad_hoc(
        &self,
        tenant: &str,
        config: &RuleConfig,
    ) -> Result<Vec<ResolvedProduct>, EngineError> {
        if config.rule_type == SmartRuleType::ManualSelection {
            return self.execute_manual(tenant, &config.product_ids).await;
        }
        self.validator.validate(config)?;
        self.run_query(tenant, config).await
    }

    /// Fetch an explicit id list. Ids that do not resolve within the tenant
    /// are dropped, not errors; repository return order is passed through.
    pub async fn execute_manual(
        &self,
        tenant: &str,
        product_ids: &[String],
    ) -> Result<Vec<ResolvedProduct>, EngineError> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw = self.products.find_by_ids(tenant, product_ids).await?;
        Ok(resolve_products(&raw))
    }

    async fn run_query(
        &self,
        tenant: &str,
        config: &RuleConfig,
    ) -> Result<Vec<ResolvedProduct>, EngineError> {
        let query = self.builder.build(tenant, config, now_millis())?;
        let raw = self.products.query(&query).await?;
        self.record_views_detached(tenant, &raw);
        Ok(resolve_products(&raw))
    }

    /// Detached best-effort view-count increment: at most once per
    /// execution, allowed to fail without affecting the response.
    fn record_views_detached(&self, tenant: &str, raw: &[Product]) {
        let ids: Vec<String> = raw
            .iter()
            .filter_map(|p| p.id.as_ref().map(|id| id.to_string()))
            .collect();
        if ids.is_empty() {
            return;
        }
        let store = Arc::clone(&self.products);
        let tenant = tenant.to_string();
        tokio::spawn(async move {
            if let Err(error) = store.record_views(&tenant, &ids).await {
                tracing::debug!(%error, "view count increment failed");
            }
        });
    }

    async fn cache_get(&self, key: &str) -> Option<Vec<ResolvedProduct>> {
        match self.cache.get(key).await {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(products) => Some(products),
                Err(error) => {
                    tracing::warn!(key, %error, "discarding undecodable cache entry");
                    None
                }
            },
            Ok(None) => None,
            Err(error) => {
                tracing::warn!(key, %error, "cache read failed, falling through to query");
                None
            }
        }
    }

    async fn cache_put(&self, key: &str, products: &[ResolvedProduct]) {
        match serde_json::to_value(products) {
            Ok(value) => {
                if let Err(error) = self.cache.set(key, value, self.cache_ttl).await {
                    tracing::warn!(key, %error, "cache write failed");
                }
            }
            Err(error) => tracing::warn!(key, %error, "cache encode failed"),
        }
    }
}
