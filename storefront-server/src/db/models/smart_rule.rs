//! Smart Rule Model
//!
//! Declarative product-selection rules. The set of rule types is closed:
//! the enums below are the single source of truth, and every dispatch on
//! them is an exhaustive `match`.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

pub type SmartRuleId = RecordId;

/// Rule type enum (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmartRuleType {
    NewArrivals,
    BestSellers,
    Trending,
    ClearanceSale,
    DeadStock,
    CategoryBased,
    PriceRange,
    LowStock,
    CustomQuery,
    ManualSelection,
}

impl SmartRuleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewArrivals => "new_arrivals",
            Self::BestSellers => "best_sellers",
            Self::Trending => "trending",
            Self::ClearanceSale => "clearance_sale",
            Self::DeadStock => "dead_stock",
            Self::CategoryBased => "category_based",
            Self::PriceRange => "price_range",
            Self::LowStock => "low_stock",
            Self::CustomQuery => "custom_query",
            Self::ManualSelection => "manual_selection",
        }
    }
}

/// Filterable product fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    Category,
    Brand,
    Price,
    Stock,
    Tags,
    CreatedAt,
    LastSold,
}

impl FilterField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Brand => "brand",
            Self::Price => "price",
            Self::Stock => "stock",
            Self::Tags => "tags",
            Self::CreatedAt => "created_at",
            Self::LastSold => "last_sold",
        }
    }
}

/// Filter operator enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    Equals,
    In,
    Gte,
    Lte,
    Between,
    Contains,
}

impl FilterOperator {
    /// Range-style operators need a second bound
    pub fn is_range(&self) -> bool {
        matches!(self, Self::Between)
    }
}

/// One field/operator/value(s) constraint within a rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleFilter {
    pub field: FilterField,
    pub operator: FilterOperator,
    pub value: serde_json::Value,
    /// Second bound for range operators
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value2: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    CreatedAt,
    LastSold,
    Price,
    Name,
    Stock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Inline rule configuration - the sole input to validation and query
/// building. Saved rules embed one; ad-hoc executions pass one directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    pub rule_type: SmartRuleType,
    #[serde(default)]
    pub filters: Vec<RuleFilter>,
    #[serde(default)]
    pub sort_by: Option<SortField>,
    #[serde(default)]
    pub sort_order: Option<SortOrder>,
    #[serde(default)]
    pub limit: Option<usize>,
    /// Minimum discount percentage for clearance rules
    #[serde(default)]
    pub min_discount_percent: Option<f64>,
    /// Explicit picks for `manual_selection` rules; ignored otherwise
    #[serde(default)]
    pub product_ids: Vec<String>,
}

impl RuleConfig {
    pub fn new(rule_type: SmartRuleType) -> Self {
        Self {
            rule_type,
            filters: Vec::new(),
            sort_by: None,
            sort_order: None,
            limit: None,
            min_discount_percent: None,
            product_ids: Vec::new(),
        }
    }
}

/// Persisted smart rule, scoped to one tenant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmartRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SmartRuleId>,
    pub tenant: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub config: RuleConfig,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: i64,
}

fn default_true() -> bool {
    true
}

/// Create smart rule payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SmartRuleCreate {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    pub config: RuleConfig,
    pub is_active: Option<bool>,
}

/// Update smart rule payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SmartRuleUpdate {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub config: Option<RuleConfig>,
    pub is_active: Option<bool>,
}
