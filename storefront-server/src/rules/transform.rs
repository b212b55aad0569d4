//! Product Transform
//!
//! The single raw-record → public-DTO derivation. Every execution path of
//! the rule engine funnels through [`resolve_product`]; derived values
//! (discount flag/label, aggregate stock, stock status) therefore agree no
//! matter how a product was selected. The transform is a pure function of
//! the catalog record.

use serde::{Deserialize, Serialize};

use crate::db::models::Product;

/// Aggregate quantities strictly below this count as "Low Stock"
pub const LOW_STOCK_THRESHOLD: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockStatus {
    #[serde(rename = "Out of Stock")]
    OutOfStock,
    #[serde(rename = "Low Stock")]
    LowStock,
    #[serde(rename = "In Stock")]
    InStock,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPrice {
    pub original: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discounted: Option<f64>,
    pub has_discount: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedStock {
    pub available: bool,
    /// Summed across all fulfillment locations
    pub quantity: i64,
    pub status: StockStatus,
}

/// Public product representation returned by every rule-engine entry point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedProduct {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub price: ResolvedPrice,
    pub stock: ResolvedStock,
    pub tags: Vec<String>,
    pub url: String,
}

/// Derive the public DTO for one catalog record
pub fn resolve_product(product: &Product) -> ResolvedProduct {
    let quantity: i64 = product.stock_locations.iter().map(|l| l.quantity).sum();
    let status = if quantity <= 0 {
        StockStatus::OutOfStock
    } else if quantity < LOW_STOCK_THRESHOLD {
        StockStatus::LowStock
    } else {
        StockStatus::InStock
    };

    // A "discount" only counts when the promotional price actually undercuts
    // the selling price
    let discounted = product
        .price
        .discounted
        .filter(|d| *d >= 0.0 && *d < product.price.selling);
    let (has_discount, discount_label) = match discounted {
        Some(d) if product.price.selling > 0.0 => {
            let percent = ((1.0 - d / product.price.selling) * 100.0).round() as i64;
            (true, Some(format!("{percent}% OFF")))
        }
        _ => (false, None),
    };

    ResolvedProduct {
        id: product
            .id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_default(),
        name: product.name.clone(),
        slug: product.slug.clone(),
        images: product.images.clone(),
        category: product.category.clone(),
        brand: product.brand.clone(),
        price: ResolvedPrice {
            original: product.price.selling,
            discounted,
            has_discount,
            discount_label,
        },
        stock: ResolvedStock {
            available: quantity > 0,
            quantity,
            status,
        },
        tags: product.tags.clone(),
        url: format!("/products/{}", product.slug),
    }
}

/// Transform a batch, preserving order
pub fn resolve_products(products: &[Product]) -> Vec<ResolvedProduct> {
    products.iter().map(resolve_product).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{ProductPrice, StockEntry};

    fn record(selling: f64, discounted: Option<f64>, quantities: &[i64]) -> Product {
        Product {
            id: None,
            tenant: "tenant:alpha".to_string(),
            name: "Sample".to_string(),
            slug: "sample".to_string(),
            images: vec!["/img/sample.webp".to_string()],
            category: Some("category:shoes".to_string()),
            brand: Some("acme".to_string()),
            price: ProductPrice {
                selling,
                discounted,
            },
            stock_locations: quantities
                .iter()
                .enumerate()
                .map(|(i, q)| StockEntry {
                    location: format!("location:{i}"),
                    quantity: *q,
                })
                .collect(),
            tags: vec!["summer".to_string()],
            is_active: true,
            created_at: 1_700_000_000_000,
            last_sold_at: None,
            view_count: 0,
        }
    }

    #[test]
    fn transform_is_deterministic() {
        let product = record(80.0, Some(60.0), &[2, 3, 1]);
        assert_eq!(resolve_product(&product), resolve_product(&product));
    }

    #[test]
    fn stock_is_summed_across_locations() {
        let resolved = resolve_product(&record(10.0, None, &[2, 3, 1]));
        assert_eq!(resolved.stock.quantity, 6);
        assert_eq!(resolved.stock.status, StockStatus::InStock);
        assert!(resolved.stock.available);
    }

    #[test]
    fn stock_status_thresholds() {
        let out = resolve_product(&record(10.0, None, &[]));
        assert_eq!(out.stock.status, StockStatus::OutOfStock);
        assert!(!out.stock.available);

        let low = resolve_product(&record(10.0, None, &[4]));
        assert_eq!(low.stock.status, StockStatus::LowStock);
        assert!(low.stock.available);

        let in_stock = resolve_product(&record(10.0, None, &[5]));
        assert_eq!(in_stock.stock.status, StockStatus::InStock);
    }

    #[test]
    fn discount_percentage_rounds_into_label() {
        let resolved = resolve_product(&record(80.0, Some(60.0), &[10]));
        assert!(resolved.price.has_discount);
        assert_eq!(resolved.price.discounted, Some(60.0));
        assert_eq!(resolved.price.discount_label.as_deref(), Some("25% OFF"));
    }

    #[test]
    fn non_undercutting_discount_is_ignored() {
        let resolved = resolve_product(&record(80.0, Some(80.0), &[10]));
        assert!(!resolved.price.has_discount);
        assert_eq!(resolved.price.discounted, None);
        assert_eq!(resolved.price.discount_label, None);

        let resolved = resolve_product(&record(80.0, Some(95.0), &[10]));
        assert!(!resolved.price.has_discount);
    }

    #[test]
    fn url_is_derived_from_slug() {
        let resolved = resolve_product(&record(10.0, None, &[1]));
        assert_eq!(resolved.url, "/products/sample");
    }
}
