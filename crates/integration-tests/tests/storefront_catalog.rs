//! Integration tests for the storefront catalog API.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The storefront server running (cargo run -p paperleaf-storefront)
//!
//! Run with: cargo test -p paperleaf-integration-tests -- --ignored

use paperleaf_integration_tests::{seed_product, shopper_client, storefront_base_url, test_pool};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::Value;

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_health_endpoints() {
    let client = shopper_client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/health"))
        .send()
        .await
        .expect("Failed to reach health endpoint");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base_url}/health/ready"))
        .send()
        .await
        .expect("Failed to reach readiness endpoint");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_product_listing_contains_seeded_product() {
    let pool = test_pool().await;
    let product = seed_product(&pool, Decimal::new(1250, 2), 5).await;

    let client = shopper_client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/products"))
        .send()
        .await
        .expect("Failed to list products");
    assert_eq!(resp.status(), StatusCode::OK);

    let products: Vec<Value> = resp.json().await.expect("Failed to parse product list");
    assert!(
        products
            .iter()
            .any(|p| p.get("slug").and_then(Value::as_str) == Some(product.slug.as_str())),
        "Seeded product missing from listing"
    );
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_product_detail_by_slug() {
    let pool = test_pool().await;
    let product = seed_product(&pool, Decimal::new(999, 2), 3).await;

    let client = shopper_client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/products/{}", product.slug))
        .send()
        .await
        .expect("Failed to get product detail");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse product");
    assert_eq!(body.get("slug").and_then(Value::as_str), Some(product.slug.as_str()));
    assert_eq!(body.get("price").and_then(Value::as_str), Some("9.99"));
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_unknown_product_slug_is_404() {
    let client = shopper_client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/products/no-such-slug"))
        .send()
        .await
        .expect("Failed to request unknown product");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_category_filter_scopes_listing() {
    let pool = test_pool().await;
    let product = seed_product(&pool, Decimal::new(1500, 2), 4).await;
    let other = seed_product(&pool, Decimal::new(800, 2), 4).await;

    let client = shopper_client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!(
            "{base_url}/products?category={}",
            product.category_slug
        ))
        .send()
        .await
        .expect("Failed to list products by category");
    assert_eq!(resp.status(), StatusCode::OK);

    let products: Vec<Value> = resp.json().await.expect("Failed to parse product list");
    let slugs: Vec<&str> = products
        .iter()
        .filter_map(|p| p.get("slug").and_then(Value::as_str))
        .collect();
    assert!(slugs.contains(&product.slug.as_str()));
    assert!(!slugs.contains(&other.slug.as_str()));
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_unknown_category_filter_is_404() {
    let client = shopper_client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/products?category=no-such-category"))
        .send()
        .await
        .expect("Failed to request unknown category");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_category_listing() {
    let pool = test_pool().await;
    let _ = seed_product(&pool, Decimal::new(500, 2), 1).await;

    let client = shopper_client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/categories"))
        .send()
        .await
        .expect("Failed to list categories");
    assert_eq!(resp.status(), StatusCode::OK);

    let categories: Vec<Value> = resp.json().await.expect("Failed to parse categories");
    assert!(!categories.is_empty());
}
