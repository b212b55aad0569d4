//! Filter Validator
//!
//! Pure validation of a rule configuration against the rule-type policy
//! table. Runs at rule-save time and again for every ad-hoc execution
//! (ad-hoc configs are never persisted, so nothing vouched for them before).
//!
//! Absent rules and unknown rule types never reach this code: the typed
//! `RuleConfig` boundary rejects them during deserialization.

use thiserror::Error;

use super::policy::RuleTypeTable;
use crate::db::models::{RuleConfig, SmartRuleType};

/// Malformed rule configuration. Carries a human-readable message and maps
/// to a 400 at the HTTP boundary.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

/// Validates rule configurations against the policy table. Stateless apart
/// from the injected table; no side effects.
#[derive(Debug, Clone, Copy)]
pub struct FilterValidator {
    table: RuleTypeTable,
}

impl FilterValidator {
    pub fn new(table: RuleTypeTable) -> Self {
        Self { table }
    }

    pub fn validate(&self, config: &RuleConfig) -> Result<(), ValidationError> {
        // Manual selections carry an id list, not filters
        if config.rule_type == SmartRuleType::ManualSelection {
            return Ok(());
        }

        let allowed = self.table.allowed_fields(config.rule_type);

        for filter in &config.filters {
            if !allowed.contains(&filter.field) {
                return Err(ValidationError(format!(
                    "field '{}' is not allowed for rule type '{}'",
                    filter.field.as_str(),
                    config.rule_type.as_str(),
                )));
            }

            if filter.value.is_null() {
                return Err(ValidationError(format!(
                    "filter on '{}' has no value",
                    filter.field.as_str(),
                )));
            }

            if filter.operator.is_range() && !has_second_bound(&filter.value2) {
                return Err(ValidationError(format!(
                    "operator 'between' on '{}' requires a second bound",
                    filter.field.as_str(),
                )));
            }
        }

        // Existence check by field name, not by value
        for required in self.table.required_fields(config.rule_type) {
            if !config.filters.iter().any(|f| f.field == *required) {
                return Err(ValidationError(format!(
                    "rule type '{}' requires a '{}' filter",
                    config.rule_type.as_str(),
                    required.as_str(),
                )));
            }
        }

        Ok(())
    }
}

fn has_second_bound(value2: &Option<serde_json::Value>) -> bool {
    match value2 {
        None => false,
        Some(serde_json::Value::Null) => false,
        Some(serde_json::Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}
