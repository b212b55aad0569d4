//! Database Models

// Catalog
pub mod category;
pub mod location;
pub mod product;

// Storefront
pub mod page;
pub mod smart_rule;

// Re-exports
pub use category::{Category, CategoryCreate, CategoryId};
pub use location::{StoreLocation, StoreLocationCreate};
pub use product::{Product, ProductCreate, ProductId, ProductPrice, StockEntry};

pub use page::{
    DataSource, ManualData, Page, PageCreate, PageId, PageStatus, PageSummary, Section,
    SectionType,
};
pub use smart_rule::{
    FilterField, FilterOperator, RuleConfig, RuleFilter, SmartRule, SmartRuleCreate, SmartRuleId,
    SmartRuleType, SmartRuleUpdate, SortField, SortOrder,
};
