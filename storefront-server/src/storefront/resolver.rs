//! Section Resolvers
//!
//! One capability per section strategy: `resolve(section, tenant) -> data`.
//! Dispatch is a flat match on `(section_type, data_source)` - no
//! inheritance, no string comparison, exhaustiveness checked at compile
//! time.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::models::{Category, DataSource, RuleConfig, Section, SectionType, StoreLocation};
use crate::db::repository::{LocationStore, PageStore, RepoError, TaxonomyStore};
use crate::rules::engine::{EngineError, RuleParams, SmartRuleEngine};
use crate::rules::transform::ResolvedProduct;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("invalid section config: {0}")]
    Config(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// One navigation entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    pub label: String,
    pub url: String,
}

/// One category-grid tile
#[derive(Debug, Clone, Serialize)]
pub struct CategoryTile {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_count: Option<u64>,
}

/// Resolved data attached to a hydrated section
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SectionData {
    Products(Vec<ResolvedProduct>),
    Categories(Vec<CategoryTile>),
    Links(Vec<NavLink>),
    Locations(Vec<StoreLocation>),
    Config(serde_json::Value),
}

impl SectionData {
    /// Placeholder for failed or skipped resolutions (serializes as `[]`)
    pub fn empty() -> Self {
        SectionData::Products(Vec::new())
    }
}

/// Resolves one section to its live data
pub struct SectionResolver {
    engine: Arc<SmartRuleEngine>,
    taxonomy: Arc<dyn TaxonomyStore>,
    pages: Arc<dyn PageStore>,
    locations: Arc<dyn LocationStore>,
}

impl SectionResolver {
    pub fn new(
        engine: Arc<SmartRuleEngine>,
        taxonomy: Arc<dyn TaxonomyStore>,
        pages: Arc<dyn PageStore>,
        locations: Arc<dyn LocationStore>,
    ) -> Self {
        Self {
            engine,
            taxonomy,
            pages,
            locations,
        }
    }

    pub async fn resolve(
        &self,
        tenant: &str,
        section: &Section,
    ) -> Result<SectionData, ResolveError> {
        match (section.section_type, section.data_source) {
            // Navigation merges regardless of declared source
            (SectionType::Navigation, _) => self.resolve_navigation(tenant, section).await,

            // Static sections: the config is the data
            (_, DataSource::Static) => Ok(SectionData::Config(section.config.clone())),

            (SectionType::CategoryGrid, DataSource::Manual) => {
                self.resolve_manual_categories(tenant, section).await
            }
            (_, DataSource::Manual) => {
                let ids = section
                    .manual_data
                    .as_ref()
                    .map(|m| m.product_ids.as_slice())
                    .unwrap_or(&[]);
                Ok(SectionData::Products(
                    self.engine.execute_manual(tenant, ids).await?,
                ))
            }

            (_, DataSource::Smart) => self.resolve_smart(tenant, section).await,

            (SectionType::CategoryGrid, DataSource::Dynamic) => {
                let categories = self.taxonomy.list_categories(tenant).await?;
                self.category_tiles(tenant, categories, with_counts(section))
                    .await
            }
            (SectionType::Locations, DataSource::Dynamic) => Ok(SectionData::Locations(
                self.locations.list_locations(tenant).await?,
            )),

            // No live data for this combination; hand the config back
            (section_type, data_source) => {
                tracing::debug!(
                    ?section_type,
                    ?data_source,
                    section = %section.id,
                    "no resolver for section, passing config through"
                );
                Ok(SectionData::Config(section.config.clone()))
            }
        }
    }

    async fn resolve_smart(
        &self,
        tenant: &str,
        section: &Section,
    ) -> Result<SectionData, ResolveError> {
        let products = match &section.smart_rule_id {
            Some(rule_id) => {
                let params: RuleParams =
                    serde_json::from_value(section.config.clone()).unwrap_or_default();
                self.engine.execute_rule(tenant, rule_id, &params).await?
            }
            None => {
                // No saved rule: the section config carries the rule inline
                let config: RuleConfig =
                    serde_json::from_value(section.config.clone()).map_err(|e| {
                        ResolveError::Config(format!(
                            "smart section needs a rule id or an inline rule config: {e}"
                        ))
                    })?;
                self.engine.execute_ad_hoc(tenant, &config).await?
            }
        };
        Ok(SectionData::Products(products))
    }

    async fn resolve_manual_categories(
        &self,
        tenant: &str,
        section: &Section,
    ) -> Result<SectionData, ResolveError> {
        let ids = section
            .manual_data
            .as_ref()
            .map(|m| m.category_ids.clone())
            .unwrap_or_default();
        if ids.is_empty() {
            return Ok(SectionData::Categories(Vec::new()));
        }
        let categories = self.taxonomy.find_categories_by_ids(tenant, &ids).await?;
        self.category_tiles(tenant, categories, with_counts(section))
            .await
    }

    async fn category_tiles(
        &self,
        tenant: &str,
        categories: Vec<Category>,
        with_counts: bool,
    ) -> Result<SectionData, ResolveError> {
        let mut tiles = Vec::with_capacity(categories.len());
        for category in categories {
            let id = category
                .id
                .as_ref()
                .map(|id| id.to_string())
                .unwrap_or_default();
            // Counting is the expensive sub-operation; strictly opt-in
            let product_count = if with_counts {
                Some(self.taxonomy.count_products(tenant, &id).await?)
            } else {
                None
            };
            tiles.push(CategoryTile {
                id,
                name: category.name,
                slug: category.slug,
                image: category.image,
                product_count,
            });
        }
        Ok(SectionData::Categories(tiles))
    }

    /// Union of the section's manually configured menu items and the
    /// tenant's published pages, deduped by URL. A manual entry is never
    /// overwritten by an auto-discovered one pointing at the same URL.
    async fn resolve_navigation(
        &self,
        tenant: &str,
        section: &Section,
    ) -> Result<SectionData, ResolveError> {
        let mut links: Vec<NavLink> = section
            .config
            .get("items")
            .map(|items| serde_json::from_value(items.clone()))
            .transpose()
            .map_err(|e| ResolveError::Config(format!("invalid navigation items: {e}")))?
            .unwrap_or_default();

        let mut seen: HashSet<String> = links.iter().map(|link| link.url.clone()).collect();

        for page in self.pages.list_published(tenant).await? {
            let url = format!("/{}", page.slug);
            if seen.insert(url.clone()) {
                links.push(NavLink {
                    label: page.title,
                    url,
                });
            }
        }

        Ok(SectionData::Links(links))
    }
}

fn with_counts(section: &Section) -> bool {
    section
        .config
        .get("with_counts")
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(false)
}
