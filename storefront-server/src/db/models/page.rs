//! Page & Section Models
//!
//! A page is an ordered list of independently-configured sections. Sections
//! are authored in the page builder and read-only here: hydration attaches
//! live data to a *new* output record, it never mutates or persists a section.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use uuid::Uuid;
use validator::Validate;

pub type PageId = RecordId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageStatus {
    Draft,
    Published,
    Archived,
}

/// Section kind - drives resolver dispatch together with [`DataSource`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    ProductGrid,
    ProductCarousel,
    CategoryGrid,
    Navigation,
    Locations,
    Banner,
}

/// Where a section's data comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Config is the data; no resolver runs
    Static,
    /// Explicit id lists picked by the operator
    Manual,
    /// Smart rule execution (saved rule or inline config)
    Smart,
    /// Live repository lookup (category grids, locations)
    Dynamic,
}

/// Explicit picks for manually curated sections
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManualData {
    #[serde(default)]
    pub product_ids: Vec<String>,
    #[serde(default)]
    pub category_ids: Vec<String>,
}

/// One configurable block of a storefront page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub section_type: SectionType,
    #[serde(default)]
    pub position: i32,
    #[serde(default = "default_config")]
    pub config: serde_json::Value,
    pub data_source: DataSource,
    /// Saved rule reference for smart sections; `None` means the rule config
    /// is inlined in `config`
    #[serde(default)]
    pub smart_rule_id: Option<String>,
    #[serde(default)]
    pub manual_data: Option<ManualData>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Section {
    pub fn new(section_type: SectionType, data_source: DataSource, position: i32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            section_type,
            position,
            config: default_config(),
            data_source,
            smart_rule_id: None,
            manual_data: None,
            is_active: true,
        }
    }
}

fn default_config() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

fn default_true() -> bool {
    true
}

/// Page model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PageId>,
    pub tenant: String,
    pub title: String,
    pub slug: String,
    pub status: PageStatus,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

/// Published page summary used for navigation merging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSummary {
    pub title: String,
    pub slug: String,
}

/// Create page payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PageCreate {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 200))]
    pub slug: String,
    pub status: Option<PageStatus>,
    pub sections: Option<Vec<Section>>,
}
