//! Page API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{Page, PageCreate};
use crate::db::repository::PageRepository;
use crate::utils::{AppError, AppResult};

/// POST /api/tenants/:tenant/pages - create a page definition
pub async fn create(
    State(state): State<ServerState>,
    Path(tenant): Path<String>,
    Json(data): Json<PageCreate>,
) -> AppResult<Json<Page>> {
    data.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let repo = PageRepository::new(state.db.clone());
    let page = repo.create(&tenant, data).await?;
    Ok(Json(page))
}
