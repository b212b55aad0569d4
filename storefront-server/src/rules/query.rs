//! Rule Query Builder
//!
//! Translates a rule configuration into a [`ProductQuery`]: the rule type's
//! base conditions plus every declared filter folded in, with the tenant
//! scope carried as a mandatory struct field. Repositories render the query
//! against their own store; the builder knows nothing about SurrealQL.

use serde_json::Value;

use super::policy::{
    DEAD_STOCK_DAYS, DEFAULT_MIN_DISCOUNT_PERCENT, DEFAULT_REORDER_LEVEL, DEFAULT_RULE_LIMIT,
    MAX_RULE_LIMIT, RuleTypeTable,
};
use super::validator::ValidationError;
use crate::db::models::{FilterField, FilterOperator, RuleConfig, RuleFilter, SmartRuleType};
use crate::db::models::{SortField, SortOrder};
use crate::utils::time::MILLIS_PER_DAY;

/// One predicate clause of a product query
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq { field: FilterField, value: Value },
    In { field: FilterField, values: Vec<Value> },
    Gte { field: FilterField, value: Value },
    Lte { field: FilterField, value: Value },
    Between { field: FilterField, low: Value, high: Value },
    Contains { field: FilterField, value: Value },
    /// Same-document comparison: `discounted <= selling * max_ratio` with a
    /// discounted price present. Never a literal bound.
    Discounted { max_ratio: f64 },
    /// Aggregate stock across fulfillment locations below a threshold
    StockBelow { threshold: i64 },
    /// Never sold, or not sold since the cutoff (Unix millis)
    NotSoldSince { cutoff: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub order: SortOrder,
}

/// A built, executable product query.
///
/// `tenant` is a required field by construction: there is no way to build a
/// query without a scope, and repositories bind it into every statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    pub tenant: String,
    pub conditions: Vec<Condition>,
    pub sort: Sort,
    pub limit: usize,
}

/// Builds product queries from validated rule configurations
#[derive(Debug, Clone, Copy)]
pub struct RuleQueryBuilder {
    table: RuleTypeTable,
}

impl RuleQueryBuilder {
    pub fn new(table: RuleTypeTable) -> Self {
        Self { table }
    }

    /// Build the query for `config`, scoped to `tenant`. `now_ms` anchors
    /// time-relative base conditions so the builder stays a pure function.
    pub fn build(
        &self,
        tenant: &str,
        config: &RuleConfig,
        now_ms: i64,
    ) -> Result<ProductQuery, ValidationError> {
        if config.rule_type == SmartRuleType::ManualSelection {
            return Err(ValidationError(
                "manual_selection rules resolve an explicit id list, not a query".to_string(),
            ));
        }

        let mut conditions = Vec::with_capacity(config.filters.len() + 1);

        // Rule-type base condition
        match config.rule_type {
            SmartRuleType::ClearanceSale => {
                let percent = config
                    .min_discount_percent
                    .unwrap_or(DEFAULT_MIN_DISCOUNT_PERCENT);
                conditions.push(Condition::Discounted {
                    max_ratio: 1.0 - percent / 100.0,
                });
            }
            SmartRuleType::DeadStock => {
                conditions.push(Condition::NotSoldSince {
                    cutoff: now_ms - DEAD_STOCK_DAYS * MILLIS_PER_DAY,
                });
            }
            SmartRuleType::LowStock => {
                conditions.push(Condition::StockBelow {
                    threshold: DEFAULT_REORDER_LEVEL,
                });
            }
            SmartRuleType::NewArrivals
            | SmartRuleType::BestSellers
            | SmartRuleType::Trending
            | SmartRuleType::CategoryBased
            | SmartRuleType::PriceRange
            | SmartRuleType::CustomQuery => {}
            SmartRuleType::ManualSelection => unreachable!("rejected above"),
        }

        // Fold declared filters into the conjunction
        for filter in &config.filters {
            conditions.push(fold_filter(filter)?);
        }

        let (default_field, default_order) = self.table.default_sort(config.rule_type);
        let sort = Sort {
            field: config.sort_by.unwrap_or(default_field),
            order: config.sort_order.unwrap_or(default_order),
        };

        let limit = config
            .limit
            .unwrap_or(DEFAULT_RULE_LIMIT)
            .clamp(1, MAX_RULE_LIMIT);

        Ok(ProductQuery {
            tenant: tenant.to_string(),
            conditions,
            sort,
            limit,
        })
    }
}

fn fold_filter(filter: &RuleFilter) -> Result<Condition, ValidationError> {
    let field = filter.field;
    let value = filter.value.clone();
    Ok(match filter.operator {
        FilterOperator::Equals => Condition::Eq { field, value },
        FilterOperator::In => Condition::In {
            field,
            values: match value {
                Value::Array(items) => items,
                other => vec![other],
            },
        },
        FilterOperator::Gte => Condition::Gte { field, value },
        FilterOperator::Lte => Condition::Lte { field, value },
        FilterOperator::Between => {
            let high = filter.value2.clone().ok_or_else(|| {
                ValidationError(format!(
                    "operator 'between' on '{}' requires a second bound",
                    field.as_str(),
                ))
            })?;
            Condition::Between {
                field,
                low: value,
                high,
            }
        }
        FilterOperator::Contains => Condition::Contains { field, value },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::RuleFilter;
    use serde_json::json;

    fn builder() -> RuleQueryBuilder {
        RuleQueryBuilder::new(RuleTypeTable)
    }

    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn tenant_scope_is_always_present() {
        let config = RuleConfig::new(SmartRuleType::CustomQuery);
        let query = builder().build("tenant:alpha", &config, NOW).unwrap();
        assert_eq!(query.tenant, "tenant:alpha");
    }

    #[test]
    fn price_range_folds_between_and_defaults() {
        let mut config = RuleConfig::new(SmartRuleType::PriceRange);
        config.filters = vec![RuleFilter {
            field: FilterField::Price,
            operator: FilterOperator::Between,
            value: json!(100),
            value2: Some(json!(500)),
        }];
        config.limit = Some(5);

        let query = builder().build("tenant:alpha", &config, NOW).unwrap();
        assert_eq!(query.limit, 5);
        assert_eq!(
            query.sort,
            Sort {
                field: SortField::Price,
                order: SortOrder::Asc
            }
        );
        assert_eq!(
            query.conditions,
            vec![Condition::Between {
                field: FilterField::Price,
                low: json!(100),
                high: json!(500),
            }]
        );
    }

    #[test]
    fn clearance_derives_ratio_from_percent() {
        let mut config = RuleConfig::new(SmartRuleType::ClearanceSale);
        config.min_discount_percent = Some(25.0);
        let query = builder().build("tenant:alpha", &config, NOW).unwrap();
        assert_eq!(
            query.conditions,
            vec![Condition::Discounted { max_ratio: 0.75 }]
        );
    }

    #[test]
    fn dead_stock_uses_now_anchored_cutoff() {
        let config = RuleConfig::new(SmartRuleType::DeadStock);
        let query = builder().build("tenant:alpha", &config, NOW).unwrap();
        assert_eq!(
            query.conditions,
            vec![Condition::NotSoldSince {
                cutoff: NOW - DEAD_STOCK_DAYS * MILLIS_PER_DAY
            }]
        );
        // And the natural ordering surfaces the longest-unsold first
        assert_eq!(query.sort.field, SortField::LastSold);
        assert_eq!(query.sort.order, SortOrder::Asc);
    }

    #[test]
    fn low_stock_filters_below_reorder_level() {
        let config = RuleConfig::new(SmartRuleType::LowStock);
        let query = builder().build("tenant:alpha", &config, NOW).unwrap();
        assert_eq!(
            query.conditions,
            vec![Condition::StockBelow {
                threshold: DEFAULT_REORDER_LEVEL
            }]
        );
    }

    #[test]
    fn limit_defaults_and_is_capped() {
        let config = RuleConfig::new(SmartRuleType::NewArrivals);
        let query = builder().build("t", &config, NOW).unwrap();
        assert_eq!(query.limit, DEFAULT_RULE_LIMIT);

        let mut config = RuleConfig::new(SmartRuleType::NewArrivals);
        config.limit = Some(10_000);
        let query = builder().build("t", &config, NOW).unwrap();
        assert_eq!(query.limit, MAX_RULE_LIMIT);
    }

    #[test]
    fn explicit_sort_overrides_natural_ordering() {
        let mut config = RuleConfig::new(SmartRuleType::NewArrivals);
        config.sort_by = Some(SortField::Name);
        config.sort_order = Some(SortOrder::Asc);
        let query = builder().build("t", &config, NOW).unwrap();
        assert_eq!(
            query.sort,
            Sort {
                field: SortField::Name,
                order: SortOrder::Asc
            }
        );
    }

    #[test]
    fn scalar_in_value_becomes_single_element_set() {
        let mut config = RuleConfig::new(SmartRuleType::CustomQuery);
        config.filters = vec![RuleFilter {
            field: FilterField::Brand,
            operator: FilterOperator::In,
            value: json!("acme"),
            value2: None,
        }];
        let query = builder().build("t", &config, NOW).unwrap();
        assert_eq!(
            query.conditions,
            vec![Condition::In {
                field: FilterField::Brand,
                values: vec![json!("acme")],
            }]
        );
    }

    #[test]
    fn manual_selection_is_not_buildable() {
        let config = RuleConfig::new(SmartRuleType::ManualSelection);
        assert!(builder().build("t", &config, NOW).is_err());
    }
}
