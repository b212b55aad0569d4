//! End-to-end flows against an in-memory database: rule execution through
//! the real repositories, and full page hydration.

use std::collections::HashSet;

use serde_json::json;
use storefront_server::core::{Config, ServerState};
use storefront_server::db::DbService;
use storefront_server::db::models::{
    CategoryCreate, DataSource, FilterField, FilterOperator, ManualData, PageCreate, PageStatus,
    ProductCreate, ProductPrice, RuleConfig, RuleFilter, Section, SectionType, SmartRuleCreate,
    SmartRuleType, StockEntry, StoreLocationCreate,
};
use storefront_server::db::repository::{
    CategoryRepository, LocationRepository, PageRepository, ProductRepository,
    SmartRuleRepository,
};
use storefront_server::rules::engine::RuleParams;
use storefront_server::storefront::resolver::SectionData;
use storefront_server::utils::time::now_millis;

async fn test_state() -> ServerState {
    let db_service = DbService::memory().await.expect("in-memory database");
    ServerState::from_parts(Config::with_overrides("/tmp/storefront-test", 0), db_service.db)
}

fn slugify(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

async fn seed_product(
    repo: &ProductRepository,
    tenant: &str,
    name: &str,
    selling: f64,
    discounted: Option<f64>,
    stock: &[i64],
    category: Option<String>,
    last_sold_at: Option<i64>,
) -> String {
    let product = repo
        .create(
            tenant,
            ProductCreate {
                name: name.to_string(),
                slug: slugify(name),
                images: None,
                category,
                brand: None,
                price: ProductPrice {
                    selling,
                    discounted,
                },
                stock_locations: Some(
                    stock
                        .iter()
                        .enumerate()
                        .map(|(i, quantity)| StockEntry {
                            location: format!("location:{i}"),
                            quantity: *quantity,
                        })
                        .collect(),
                ),
                tags: None,
                created_at: Some(now_millis()),
                last_sold_at,
            },
        )
        .await
        .expect("seed product");
    product.id.expect("created product id").to_string()
}

#[tokio::test]
async fn price_range_rule_applies_bounds_limit_and_tenant_scope() {
    let state = test_state().await;
    let products = ProductRepository::new(state.db.clone());

    // 20 products for tenant alpha, 6 of them priced inside [100, 500]
    let in_range = [100.0, 150.0, 200.0, 250.0, 300.0, 500.0];
    for (i, price) in in_range.iter().enumerate() {
        seed_product(&products, "tenant:alpha", &format!("In Range {i}"), *price, None, &[10], None, None)
            .await;
    }
    for i in 0..14 {
        let price = if i % 2 == 0 { 50.0 + i as f64 } else { 600.0 + i as f64 };
        seed_product(&products, "tenant:alpha", &format!("Out Of Range {i}"), price, None, &[10], None, None)
            .await;
    }
    // A competitor's product inside the range must never leak across tenants
    let foreign = seed_product(
        &products,
        "tenant:beta",
        "Foreign Product",
        200.0,
        None,
        &[10],
        None,
        None,
    )
    .await;

    let mut config = RuleConfig::new(SmartRuleType::PriceRange);
    config.filters = vec![RuleFilter {
        field: FilterField::Price,
        operator: FilterOperator::Between,
        value: json!(100),
        value2: Some(json!(500)),
    }];
    config.limit = Some(5);

    let resolved = state
        .rule_engine
        .execute_ad_hoc("tenant:alpha", &config)
        .await
        .expect("price range execution");

    assert_eq!(resolved.len(), 5);
    for product in &resolved {
        assert!(product.price.original >= 100.0 && product.price.original <= 500.0);
        assert_ne!(product.id, foreign);
    }
    // Natural ordering for price_range is price ascending
    let prices: Vec<f64> = resolved.iter().map(|p| p.price.original).collect();
    assert_eq!(prices, vec![100.0, 150.0, 200.0, 250.0, 300.0]);
}

#[tokio::test]
async fn manual_selection_skips_missing_ids_without_error() {
    let state = test_state().await;
    let products = ProductRepository::new(state.db.clone());

    let a = seed_product(&products, "tenant:alpha", "Pick A", 10.0, None, &[5], None, None).await;
    let b = seed_product(&products, "tenant:alpha", "Pick B", 20.0, None, &[5], None, None).await;

    let resolved = state
        .rule_engine
        .execute_manual(
            "tenant:alpha",
            &[a.clone(), b.clone(), "product:doesnotexist".to_string()],
        )
        .await
        .expect("manual selection");

    assert_eq!(resolved.len(), 2);
    let ids: HashSet<String> = resolved.iter().map(|p| p.id.clone()).collect();
    assert!(ids.contains(&a) && ids.contains(&b));
}

#[tokio::test]
async fn clearance_rule_requires_the_configured_discount_depth() {
    let state = test_state().await;
    let products = ProductRepository::new(state.db.clone());

    // 50% off, 10% off, no discount
    let deep = seed_product(&products, "tenant:alpha", "Deep Cut", 100.0, Some(50.0), &[10], None, None).await;
    seed_product(&products, "tenant:alpha", "Shallow Cut", 100.0, Some(90.0), &[10], None, None).await;
    seed_product(&products, "tenant:alpha", "Full Price", 100.0, None, &[10], None, None).await;

    let mut config = RuleConfig::new(SmartRuleType::ClearanceSale);
    config.min_discount_percent = Some(20.0);

    let resolved = state
        .rule_engine
        .execute_ad_hoc("tenant:alpha", &config)
        .await
        .expect("clearance execution");

    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].id, deep);
    assert!(resolved[0].price.has_discount);
    assert_eq!(resolved[0].price.discount_label.as_deref(), Some("50% OFF"));
}

#[tokio::test]
async fn low_stock_rule_sums_quantities_across_locations() {
    let state = test_state().await;
    let products = ProductRepository::new(state.db.clone());

    let scarce =
        seed_product(&products, "tenant:alpha", "Scarce", 10.0, None, &[1, 2], None, None).await;
    seed_product(&products, "tenant:alpha", "Plentiful", 10.0, None, &[30, 20], None, None).await;

    let config = RuleConfig::new(SmartRuleType::LowStock);
    let resolved = state
        .rule_engine
        .execute_ad_hoc("tenant:alpha", &config)
        .await
        .expect("low stock execution");

    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].id, scarce);
    assert_eq!(resolved[0].stock.quantity, 3);
}

#[tokio::test]
async fn dead_stock_rule_finds_never_and_long_unsold_products() {
    let state = test_state().await;
    let products = ProductRepository::new(state.db.clone());

    let never_sold =
        seed_product(&products, "tenant:alpha", "Dusty", 10.0, None, &[10], None, None).await;
    let long_ago = seed_product(
        &products,
        "tenant:alpha",
        "Forgotten",
        10.0,
        None,
        &[10],
        None,
        Some(now_millis() - 120 * 86_400_000),
    )
    .await;
    seed_product(
        &products,
        "tenant:alpha",
        "Fresh Seller",
        10.0,
        None,
        &[10],
        None,
        Some(now_millis() - 86_400_000),
    )
    .await;

    let config = RuleConfig::new(SmartRuleType::DeadStock);
    let resolved = state
        .rule_engine
        .execute_ad_hoc("tenant:alpha", &config)
        .await
        .expect("dead stock execution");

    let ids: HashSet<String> = resolved.iter().map(|p| p.id.clone()).collect();
    assert_eq!(ids, HashSet::from([never_sold, long_ago]));
}

#[tokio::test]
async fn saved_rules_execute_and_cache_within_their_tenant() {
    let state = test_state().await;
    let products = ProductRepository::new(state.db.clone());
    let rules = SmartRuleRepository::new(state.db.clone());

    seed_product(
        &products,
        "tenant:alpha",
        "Hot Item",
        10.0,
        None,
        &[10],
        None,
        Some(now_millis() - 3_600_000),
    )
    .await;

    let mut config = RuleConfig::new(SmartRuleType::BestSellers);
    config.limit = Some(4);
    let rule = rules
        .create(
            "tenant:alpha",
            SmartRuleCreate {
                name: "Homepage best sellers".to_string(),
                description: None,
                config,
                is_active: None,
            },
        )
        .await
        .expect("create rule");
    let rule_id = rule.id.expect("rule id").to_string();

    let params = RuleParams::default();
    let first = state
        .rule_engine
        .execute_rule("tenant:alpha", &rule_id, &params)
        .await
        .expect("first execution");
    let second = state
        .rule_engine
        .execute_rule("tenant:alpha", &rule_id, &params)
        .await
        .expect("second execution (cached)");
    assert_eq!(first, second);
    assert_eq!(first.len(), 1);

    // The same rule id does not resolve for another tenant
    let err = state
        .rule_engine
        .execute_rule("tenant:beta", &rule_id, &params)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[tokio::test]
async fn published_page_hydrates_every_active_section_in_order() {
    let state = test_state().await;
    let products = ProductRepository::new(state.db.clone());
    let categories = CategoryRepository::new(state.db.clone());
    let locations = LocationRepository::new(state.db.clone());
    let pages = PageRepository::new(state.db.clone());

    let shoes = categories
        .create(
            "tenant:alpha",
            CategoryCreate {
                name: "Shoes".to_string(),
                slug: "shoes".to_string(),
                image: None,
                sort_order: Some(1),
            },
        )
        .await
        .expect("create category");
    let shoes_id = shoes.id.expect("category id").to_string();

    let picked = seed_product(
        &products,
        "tenant:alpha",
        "Runner",
        120.0,
        Some(90.0),
        &[3],
        Some(shoes_id.clone()),
        Some(now_millis() - 3_600_000),
    )
    .await;
    seed_product(
        &products,
        "tenant:alpha",
        "Walker",
        80.0,
        None,
        &[20],
        Some(shoes_id.clone()),
        Some(now_millis() - 7_200_000),
    )
    .await;

    locations
        .create(
            "tenant:alpha",
            StoreLocationCreate {
                name: "Flagship".to_string(),
                address: "1 Harbor Road".to_string(),
                phone: None,
                sort_order: None,
            },
        )
        .await
        .expect("create location");

    // Sections: static banner, smart grid (inline rule), manual pick,
    // category grid with live counts, navigation, locations, and one
    // inactive section that must not appear at all
    let mut banner = Section::new(SectionType::Banner, DataSource::Static, 0);
    banner.config = json!({"headline": "Welcome"});

    let mut smart = Section::new(SectionType::ProductGrid, DataSource::Smart, 1);
    smart.config = json!({"rule_type": "best_sellers", "limit": 2});

    let mut manual = Section::new(SectionType::ProductCarousel, DataSource::Manual, 2);
    manual.manual_data = Some(ManualData {
        product_ids: vec![picked.clone(), "product:ghost".to_string()],
        category_ids: vec![],
    });

    let mut grid = Section::new(SectionType::CategoryGrid, DataSource::Dynamic, 3);
    grid.config = json!({"with_counts": true});

    let mut nav = Section::new(SectionType::Navigation, DataSource::Dynamic, 4);
    nav.config = json!({"items": [{"label": "Contact", "url": "/contact"}]});

    let location_list = Section::new(SectionType::Locations, DataSource::Dynamic, 5);

    let mut hidden = Section::new(SectionType::Banner, DataSource::Static, 6);
    hidden.is_active = false;

    pages
        .create(
            "tenant:alpha",
            PageCreate {
                title: "Home".to_string(),
                slug: "home".to_string(),
                status: Some(PageStatus::Published),
                sections: Some(vec![banner, smart, manual, grid, nav, location_list, hidden]),
            },
        )
        .await
        .expect("create page");

    let page = PageRepository::new(state.db.clone())
        .find_by_slug("tenant:alpha", "home")
        .await
        .expect("page lookup")
        .expect("page exists");

    let hydrated = state.orchestrator.hydrate_page("tenant:alpha", &page).await;

    assert_eq!(hydrated.slug, "home");
    assert_eq!(hydrated.sections.len(), 6);
    let positions: Vec<i32> = hydrated.sections.iter().map(|s| s.position).collect();
    assert_eq!(positions, vec![0, 1, 2, 3, 4, 5]);
    assert!(hydrated.sections.iter().all(|s| !s.error));

    // Static banner: config unchanged
    match &hydrated.sections[0].data {
        SectionData::Config(config) => assert_eq!(config["headline"], json!("Welcome")),
        other => panic!("expected config data, got {other:?}"),
    }

    // Smart grid: both sellers, most recent sale first
    match &hydrated.sections[1].data {
        SectionData::Products(list) => {
            assert_eq!(list.len(), 2);
            assert_eq!(list[0].name, "Runner");
            assert!(list[0].price.has_discount);
        }
        other => panic!("expected products, got {other:?}"),
    }

    // Manual carousel: the ghost id is dropped silently
    match &hydrated.sections[2].data {
        SectionData::Products(list) => {
            assert_eq!(list.len(), 1);
            assert_eq!(list[0].id, picked);
        }
        other => panic!("expected products, got {other:?}"),
    }

    // Category grid: live count was requested
    match &hydrated.sections[3].data {
        SectionData::Categories(tiles) => {
            assert_eq!(tiles.len(), 1);
            assert_eq!(tiles[0].slug, "shoes");
            assert_eq!(tiles[0].product_count, Some(2));
        }
        other => panic!("expected categories, got {other:?}"),
    }

    // Navigation: manual item first, then the published page itself
    match &hydrated.sections[4].data {
        SectionData::Links(links) => {
            assert_eq!(links.len(), 2);
            assert_eq!(links[0].url, "/contact");
            assert_eq!(links[1].url, "/home");
            assert_eq!(links[1].label, "Home");
        }
        other => panic!("expected links, got {other:?}"),
    }

    // Locations resolved from the repository
    match &hydrated.sections[5].data {
        SectionData::Locations(list) => {
            assert_eq!(list.len(), 1);
            assert_eq!(list[0].name, "Flagship");
        }
        other => panic!("expected locations, got {other:?}"),
    }
}
