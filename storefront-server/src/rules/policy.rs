//! Rule-Type Policy Table
//!
//! The capability matrix for the closed set of rule types: which filter
//! fields each type accepts, which it requires, and its natural ordering.
//! One immutable value owns the table; the validator and the query builder
//! receive it at construction and never consult ambient state.

use crate::db::models::{FilterField, SmartRuleType, SortField, SortOrder};

/// Result cap applied when a rule does not set its own limit
pub const DEFAULT_RULE_LIMIT: usize = 10;

/// Hard cap on rule results regardless of configuration
pub const MAX_RULE_LIMIT: usize = 50;

/// Dead-stock window: no sale within this many days
pub const DEAD_STOCK_DAYS: i64 = 60;

/// Reorder level used by `low_stock` rules
pub const DEFAULT_REORDER_LEVEL: i64 = 10;

/// Minimum discount (percent) a clearance rule requires when unconfigured
pub const DEFAULT_MIN_DISCOUNT_PERCENT: f64 = 10.0;

/// Immutable rule-type capability table.
///
/// Methods `match` exhaustively on [`SmartRuleType`], so extending the closed
/// set forces every policy decision to be revisited at compile time.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleTypeTable;

impl RuleTypeTable {
    /// Filter fields a rule type accepts
    pub fn allowed_fields(&self, rule_type: SmartRuleType) -> &'static [FilterField] {
        use FilterField::*;
        match rule_type {
            SmartRuleType::NewArrivals => &[CreatedAt, Tags],
            SmartRuleType::BestSellers | SmartRuleType::Trending => &[LastSold, Tags],
            SmartRuleType::ClearanceSale => &[Price],
            SmartRuleType::DeadStock => &[LastSold, Tags],
            SmartRuleType::CategoryBased => &[Category],
            SmartRuleType::PriceRange => &[Price],
            SmartRuleType::LowStock => &[Stock],
            SmartRuleType::CustomQuery => {
                &[Category, Brand, Price, Stock, Tags, CreatedAt, LastSold]
            }
            // Manual selection ignores filters entirely
            SmartRuleType::ManualSelection => &[],
        }
    }

    /// Filter fields a rule type cannot run without
    pub fn required_fields(&self, rule_type: SmartRuleType) -> &'static [FilterField] {
        match rule_type {
            SmartRuleType::CategoryBased => &[FilterField::Category],
            SmartRuleType::PriceRange => &[FilterField::Price],
            SmartRuleType::NewArrivals
            | SmartRuleType::BestSellers
            | SmartRuleType::Trending
            | SmartRuleType::ClearanceSale
            | SmartRuleType::DeadStock
            | SmartRuleType::LowStock
            | SmartRuleType::CustomQuery
            | SmartRuleType::ManualSelection => &[],
        }
    }

    /// Natural ordering applied when a rule sets no sort of its own
    pub fn default_sort(&self, rule_type: SmartRuleType) -> (SortField, SortOrder) {
        match rule_type {
            SmartRuleType::NewArrivals => (SortField::CreatedAt, SortOrder::Desc),
            SmartRuleType::BestSellers | SmartRuleType::Trending => {
                (SortField::LastSold, SortOrder::Desc)
            }
            SmartRuleType::ClearanceSale => (SortField::Price, SortOrder::Asc),
            SmartRuleType::DeadStock => (SortField::LastSold, SortOrder::Asc),
            SmartRuleType::CategoryBased => (SortField::CreatedAt, SortOrder::Desc),
            SmartRuleType::PriceRange => (SortField::Price, SortOrder::Asc),
            SmartRuleType::LowStock => (SortField::Stock, SortOrder::Asc),
            SmartRuleType::CustomQuery => (SortField::CreatedAt, SortOrder::Desc),
            // Unused: manual selections keep repository order
            SmartRuleType::ManualSelection => (SortField::CreatedAt, SortOrder::Desc),
        }
    }
}
