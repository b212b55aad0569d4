//! Storefront API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{PageStatus, Section};
use crate::db::repository::PageRepository;
use crate::storefront::hydrator::{HydratedPage, HydratedSection};
use crate::utils::{AppError, AppResult};

/// GET /api/tenants/:tenant/storefront/pages/:slug - fetch a published page
/// and hydrate its sections
pub async fn page_by_slug(
    State(state): State<ServerState>,
    Path((tenant, slug)): Path<(String, String)>,
) -> AppResult<Json<HydratedPage>> {
    let repo = PageRepository::new(state.db.clone());
    let page = repo
        .find_by_slug(&tenant, &slug)
        .await?
        .filter(|page| page.status == PageStatus::Published)
        .ok_or_else(|| AppError::not_found(format!("Page {slug}")))?;

    Ok(Json(state.orchestrator.hydrate_page(&tenant, &page).await))
}

/// POST /api/tenants/:tenant/storefront/hydrate - hydrate a posted section
/// list (page-builder preview of an unsaved layout)
pub async fn hydrate(
    State(state): State<ServerState>,
    Path(tenant): Path<String>,
    Json(sections): Json<Vec<Section>>,
) -> AppResult<Json<Vec<HydratedSection>>> {
    Ok(Json(
        state.orchestrator.hydrate_sections(&tenant, &sections).await,
    ))
}
