//! Product Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type ProductId = RecordId;

/// Unit pricing as stored on the catalog record.
///
/// `discounted` is the live promotional price; absence means the product
/// sells at `selling`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPrice {
    pub selling: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discounted: Option<f64>,
}

/// Per-fulfillment-location stock entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockEntry {
    /// Fulfillment location id ("location:xxx")
    pub location: String,
    pub quantity: i64,
}

/// Product model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    /// Owning tenant id ("tenant:xxx")
    pub tenant: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub images: Vec<String>,
    /// Category id ("category:xxx")
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    pub price: ProductPrice,
    #[serde(default)]
    pub stock_locations: Vec<StockEntry>,
    /// Tag ids ("tag:xxx") or plain labels
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Unix millis
    #[serde(default)]
    pub created_at: i64,
    /// Unix millis of the most recent sale, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sold_at: Option<i64>,
    #[serde(default)]
    pub view_count: i64,
}

fn default_true() -> bool {
    true
}

/// Create product payload (seeding and catalog-sync tooling)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub slug: String,
    pub images: Option<Vec<String>>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub price: ProductPrice,
    pub stock_locations: Option<Vec<StockEntry>>,
    pub tags: Option<Vec<String>>,
    pub created_at: Option<i64>,
    pub last_sold_at: Option<i64>,
}
