//! Smart Rule API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{RuleConfig, SmartRule, SmartRuleCreate, SmartRuleUpdate};
use crate::db::repository::SmartRuleRepository;
use crate::rules::engine::{RuleParams, rule_cache_prefix};
use crate::rules::transform::ResolvedProduct;
use crate::utils::{AppError, AppResult};

/// GET /api/tenants/:tenant/smart-rules - list rules
pub async fn list(
    State(state): State<ServerState>,
    Path(tenant): Path<String>,
) -> AppResult<Json<Vec<SmartRule>>> {
    let repo = SmartRuleRepository::new(state.db.clone());
    let rules = repo.list(&tenant).await?;
    Ok(Json(rules))
}

/// POST /api/tenants/:tenant/smart-rules - create a rule
///
/// The configuration is validated here, at save time; execution trusts it.
pub async fn create(
    State(state): State<ServerState>,
    Path(tenant): Path<String>,
    Json(data): Json<SmartRuleCreate>,
) -> AppResult<Json<SmartRule>> {
    data.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    state
        .rule_engine
        .validate(&data.config)
        .map_err(|e| AppError::validation(e.to_string()))?;

    let repo = SmartRuleRepository::new(state.db.clone());
    let rule = repo.create(&tenant, data).await?;
    Ok(Json(rule))
}

/// GET /api/tenants/:tenant/smart-rules/:id - fetch a rule
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path((tenant, id)): Path<(String, String)>,
) -> AppResult<Json<SmartRule>> {
    let repo = SmartRuleRepository::new(state.db.clone());
    let rule = repo
        .find(&tenant, &id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Smart rule {id}")))?;
    Ok(Json(rule))
}

/// PUT /api/tenants/:tenant/smart-rules/:id - update a rule
pub async fn update(
    State(state): State<ServerState>,
    Path((tenant, id)): Path<(String, String)>,
    Json(data): Json<SmartRuleUpdate>,
) -> AppResult<Json<SmartRule>> {
    data.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    if let Some(config) = &data.config {
        state
            .rule_engine
            .validate(config)
            .map_err(|e| AppError::validation(e.to_string()))?;
    }

    let repo = SmartRuleRepository::new(state.db.clone());
    let rule = repo.update(&tenant, &id, data).await?;
    invalidate_rule_cache(&state, &tenant, &id).await;
    Ok(Json(rule))
}

/// DELETE /api/tenants/:tenant/smart-rules/:id - delete a rule
pub async fn delete(
    State(state): State<ServerState>,
    Path((tenant, id)): Path<(String, String)>,
) -> AppResult<Json<serde_json::Value>> {
    let repo = SmartRuleRepository::new(state.db.clone());
    repo.delete(&tenant, &id).await?;
    invalidate_rule_cache(&state, &tenant, &id).await;
    Ok(Json(serde_json::json!({ "deleted": id })))
}

#[derive(Debug, Default, Deserialize)]
pub struct ExecuteBody {
    #[serde(default)]
    pub limit: Option<usize>,
}

/// POST /api/tenants/:tenant/smart-rules/:id/execute - run a saved rule
pub async fn execute(
    State(state): State<ServerState>,
    Path((tenant, id)): Path<(String, String)>,
    body: Option<Json<ExecuteBody>>,
) -> AppResult<Json<Vec<ResolvedProduct>>> {
    let params = RuleParams {
        limit: body.and_then(|Json(b)| b.limit),
    };
    let products = state.rule_engine.execute_rule(&tenant, &id, &params).await?;
    Ok(Json(products))
}

/// POST /api/tenants/:tenant/smart-rules/preview - run an inline rule
/// config without saving it (page-builder live preview)
pub async fn preview(
    State(state): State<ServerState>,
    Path(tenant): Path<String>,
    Json(config): Json<RuleConfig>,
) -> AppResult<Json<Vec<ResolvedProduct>>> {
    let products = state.rule_engine.execute_ad_hoc(&tenant, &config).await?;
    Ok(Json(products))
}

/// Writes to a rule must not serve stale sections for a full TTL window
async fn invalidate_rule_cache(state: &ServerState, tenant: &str, rule_id: &str) {
    if let Err(error) = state
        .cache
        .remove_prefix(&rule_cache_prefix(tenant, rule_id))
        .await
    {
        tracing::warn!(tenant, rule_id, %error, "rule cache invalidation failed");
    }
}
