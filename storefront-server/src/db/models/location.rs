//! Store Location Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Physical store / fulfillment location shown on location sections
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub tenant: String,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Create location payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreLocationCreate {
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub sort_order: Option<i32>,
}
