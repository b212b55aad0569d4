//! Product Repository
//!
//! Renders built [`ProductQuery`] values into bound-parameter SurrealQL and
//! runs them. The tenant clause is emitted unconditionally; it comes from
//! the query struct, never from filter content.

use async_trait::async_trait;
use serde_json::{Value, json};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, ProductStore, RepoError, RepoResult, record_id};
use crate::db::models::{FilterField, Product, ProductCreate, SortField, SortOrder};
use crate::rules::query::{Condition, ProductQuery};
use crate::utils::time::now_millis;

const PRODUCT_TABLE: &str = "product";

/// Document path (or aggregate expression) for a filterable field
fn filter_path(field: FilterField) -> &'static str {
    match field {
        FilterField::Category => "category",
        FilterField::Brand => "brand",
        FilterField::Price => "price.selling",
        FilterField::Stock => "math::sum(stock_locations.quantity)",
        FilterField::Tags => "tags",
        FilterField::CreatedAt => "created_at",
        FilterField::LastSold => "last_sold_at",
    }
}

/// Sort expression; selected under an alias so ORDER BY works for nested
/// paths and aggregates alike
fn sort_expr(field: SortField) -> &'static str {
    match field {
        SortField::CreatedAt => "created_at",
        SortField::LastSold => "last_sold_at",
        SortField::Price => "price.selling",
        SortField::Name => "name",
        SortField::Stock => "math::sum(stock_locations.quantity)",
    }
}

/// Render a product query to SurrealQL plus its named bindings.
/// `$tenant` is bound separately by the caller.
pub(crate) fn render_product_query(query: &ProductQuery) -> (String, Vec<(String, Value)>) {
    let mut bindings: Vec<(String, Value)> = Vec::new();
    let mut sql = format!(
        "SELECT *, {} AS sort_key FROM product WHERE tenant = $tenant AND is_active = true",
        sort_expr(query.sort.field)
    );

    for (i, condition) in query.conditions.iter().enumerate() {
        let p = format!("c{i}");
        let clause = match condition {
            Condition::Eq { field, value } => {
                bindings.push((p.clone(), value.clone()));
                format!("{} = ${p}", filter_path(*field))
            }
            Condition::In { field, values } => {
                bindings.push((p.clone(), Value::Array(values.clone())));
                if *field == FilterField::Tags {
                    format!("tags CONTAINSANY ${p}")
                } else {
                    format!("{} IN ${p}", filter_path(*field))
                }
            }
            Condition::Gte { field, value } => {
                bindings.push((p.clone(), value.clone()));
                format!("{} >= ${p}", filter_path(*field))
            }
            Condition::Lte { field, value } => {
                bindings.push((p.clone(), value.clone()));
                format!("{} <= ${p}", filter_path(*field))
            }
            Condition::Between { field, low, high } => {
                let pb = format!("c{i}b");
                bindings.push((p.clone(), low.clone()));
                bindings.push((pb.clone(), high.clone()));
                let path = filter_path(*field);
                format!("({path} >= ${p} AND {path} <= ${pb})")
            }
            Condition::Contains { field, value } => {
                bindings.push((p.clone(), value.clone()));
                if *field == FilterField::Tags {
                    format!("tags CONTAINS ${p}")
                } else {
                    format!("string::contains({}, ${p})", filter_path(*field))
                }
            }
            Condition::Discounted { max_ratio } => {
                bindings.push((p.clone(), json!(max_ratio)));
                format!(
                    "(price.discounted != NONE AND price.discounted <= price.selling * ${p})"
                )
            }
            Condition::StockBelow { threshold } => {
                bindings.push((p.clone(), json!(threshold)));
                format!("math::sum(stock_locations.quantity) < ${p}")
            }
            Condition::NotSoldSince { cutoff } => {
                bindings.push((p.clone(), json!(cutoff)));
                // Absent and null both mean "never sold"
                format!("(last_sold_at = NONE OR last_sold_at = NULL OR last_sold_at <= ${p})")
            }
        };
        sql.push_str(" AND ");
        sql.push_str(&clause);
    }

    let direction = match query.sort.order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    };
    sql.push_str(&format!(" ORDER BY sort_key {direction} LIMIT {}", query.limit));

    (sql, bindings)
}

// =============================================================================
// Product Repository
// =============================================================================

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a new product
    pub async fn create(&self, tenant: &str, data: ProductCreate) -> RepoResult<Product> {
        let product = Product {
            id: None,
            tenant: tenant.to_string(),
            name: data.name,
            slug: data.slug,
            images: data.images.unwrap_or_default(),
            category: data.category,
            brand: data.brand,
            price: data.price,
            stock_locations: data.stock_locations.unwrap_or_default(),
            tags: data.tags.unwrap_or_default(),
            is_active: true,
            created_at: data.created_at.unwrap_or_else(now_millis),
            last_sold_at: data.last_sold_at,
            view_count: 0,
        };

        let created: Option<Product> = self
            .base
            .db()
            .create(PRODUCT_TABLE)
            .content(product)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }
}

#[async_trait]
impl ProductStore for ProductRepository {
    async fn query(&self, query: &ProductQuery) -> RepoResult<Vec<Product>> {
        let (sql, bindings) = render_product_query(query);
        let mut request = self
            .base
            .db()
            .query(sql)
            .bind(("tenant", query.tenant.clone()));
        for (name, value) in bindings {
            request = request.bind((name, value));
        }
        let products: Vec<Product> = request.await?.take(0)?;
        Ok(products)
    }

    async fn find_by_ids(&self, tenant: &str, ids: &[String]) -> RepoResult<Vec<Product>> {
        let ids: Vec<surrealdb::RecordId> = ids
            .iter()
            .map(|id| record_id(PRODUCT_TABLE, id))
            .collect();
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE tenant = $tenant AND is_active = true AND id IN $ids")
            .bind(("tenant", tenant.to_string()))
            .bind(("ids", ids))
            .await?
            .take(0)?;
        Ok(products)
    }

    async fn record_views(&self, tenant: &str, ids: &[String]) -> RepoResult<()> {
        let ids: Vec<surrealdb::RecordId> = ids
            .iter()
            .map(|id| record_id(PRODUCT_TABLE, id))
            .collect();
        self.base
            .db()
            .query("UPDATE product SET view_count += 1 WHERE tenant = $tenant AND id IN $ids")
            .bind(("tenant", tenant.to_string()))
            .bind(("ids", ids))
            .await?
            .check()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::query::Sort;

    fn query_with(conditions: Vec<Condition>) -> ProductQuery {
        ProductQuery {
            tenant: "tenant:alpha".to_string(),
            conditions,
            sort: Sort {
                field: SortField::CreatedAt,
                order: SortOrder::Desc,
            },
            limit: 8,
        }
    }

    #[test]
    fn tenant_clause_and_ordering_are_always_rendered() {
        let (sql, bindings) = render_product_query(&query_with(vec![]));
        assert!(sql.contains("WHERE tenant = $tenant AND is_active = true"));
        assert!(sql.ends_with("ORDER BY sort_key DESC LIMIT 8"));
        assert!(bindings.is_empty());
    }

    #[test]
    fn between_renders_inclusive_two_sided_bound() {
        let (sql, bindings) = render_product_query(&query_with(vec![Condition::Between {
            field: FilterField::Price,
            low: json!(100),
            high: json!(500),
        }]));
        assert!(sql.contains("(price.selling >= $c0 AND price.selling <= $c0b)"));
        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings[0], ("c0".to_string(), json!(100)));
        assert_eq!(bindings[1], ("c0b".to_string(), json!(500)));
    }

    #[test]
    fn discount_predicate_compares_fields_not_literals() {
        let (sql, bindings) = render_product_query(&query_with(vec![Condition::Discounted {
            max_ratio: 0.75,
        }]));
        assert!(
            sql.contains("price.discounted != NONE AND price.discounted <= price.selling * $c0")
        );
        assert_eq!(bindings, vec![("c0".to_string(), json!(0.75))]);
    }

    #[test]
    fn tag_membership_uses_contains() {
        let (sql, _) = render_product_query(&query_with(vec![Condition::Contains {
            field: FilterField::Tags,
            value: json!("summer"),
        }]));
        assert!(sql.contains("tags CONTAINS $c0"));

        let (sql, _) = render_product_query(&query_with(vec![Condition::In {
            field: FilterField::Tags,
            values: vec![json!("summer"), json!("sale")],
        }]));
        assert!(sql.contains("tags CONTAINSANY $c0"));
    }

    #[test]
    fn aggregate_stock_conditions_and_sort_share_one_expression() {
        let query = ProductQuery {
            tenant: "tenant:alpha".to_string(),
            conditions: vec![Condition::StockBelow { threshold: 10 }],
            sort: Sort {
                field: SortField::Stock,
                order: SortOrder::Asc,
            },
            limit: 10,
        };
        let (sql, _) = render_product_query(&query);
        assert!(sql.starts_with("SELECT *, math::sum(stock_locations.quantity) AS sort_key"));
        assert!(sql.contains("math::sum(stock_locations.quantity) < $c0"));
        assert!(sql.ends_with("ORDER BY sort_key ASC LIMIT 10"));
    }

    #[test]
    fn dead_stock_condition_matches_never_sold() {
        let (sql, _) = render_product_query(&query_with(vec![Condition::NotSoldSince {
            cutoff: 1_000,
        }]));
        assert!(sql.contains("(last_sold_at = NONE OR last_sold_at = NULL OR last_sold_at <= $c0)"));
    }
}
