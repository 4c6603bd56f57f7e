//! Integration tests for the cart API.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The storefront server running (cargo run -p paperleaf-storefront)
//!
//! Run with: cargo test -p paperleaf-integration-tests -- --ignored

use std::str::FromStr;

use paperleaf_integration_tests::{seed_product, shopper_client, storefront_base_url, test_pool};
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde_json::{Value, json};

async fn add_to_cart(client: &Client, product_id: i32, quantity: i32) -> reqwest::Response {
    let base_url = storefront_base_url();
    client
        .post(format!("{base_url}/cart/add"))
        .json(&json!({"product_id": product_id, "quantity": quantity}))
        .send()
        .await
        .expect("Failed to post cart add")
}

fn cart_total(body: &Value) -> Decimal {
    let raw = body
        .get("total_price")
        .and_then(Value::as_str)
        .expect("Cart view missing total_price");
    Decimal::from_str(raw).expect("total_price is not a decimal")
}

// ============================================================================
// Add & Merge Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_add_to_cart_returns_contents() {
    let pool = test_pool().await;
    let product = seed_product(&pool, Decimal::new(1000, 2), 10).await;

    let client = shopper_client();
    let resp = add_to_cart(&client, product.id, 2).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse cart view");
    let lines = body.get("lines").and_then(Value::as_array).expect("no lines");
    assert_eq!(lines.len(), 1);
    assert_eq!(body.get("item_count").and_then(Value::as_i64), Some(2));
    assert_eq!(cart_total(&body), Decimal::new(2000, 2));
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_repeat_add_merges_into_one_line() {
    let pool = test_pool().await;
    let product = seed_product(&pool, Decimal::new(1000, 2), 10).await;

    let client = shopper_client();
    add_to_cart(&client, product.id, 2).await;
    let resp = add_to_cart(&client, product.id, 1).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse cart view");
    let lines = body.get("lines").and_then(Value::as_array).expect("no lines");
    assert_eq!(lines.len(), 1, "Repeat add must merge, not duplicate");
    assert_eq!(
        lines.first().and_then(|l| l.get("quantity")).and_then(Value::as_i64),
        Some(3)
    );
    assert_eq!(cart_total(&body), Decimal::new(3000, 2));
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_concurrent_adds_merge() {
    let pool = test_pool().await;
    let product = seed_product(&pool, Decimal::new(500, 2), 99).await;

    let client = shopper_client();
    // Establish the session cookie before racing
    add_to_cart(&client, product.id, 1).await;

    let results = futures_join(&client, product.id).await;
    for status in results {
        assert_eq!(status, StatusCode::OK);
    }

    let base_url = storefront_base_url();
    let resp = client
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .expect("Failed to get cart");
    let body: Value = resp.json().await.expect("Failed to parse cart view");
    let lines = body.get("lines").and_then(Value::as_array).expect("no lines");
    assert_eq!(lines.len(), 1, "Concurrent adds must land on one line");
    assert_eq!(body.get("item_count").and_then(Value::as_i64), Some(1 + 4));
}

async fn futures_join(client: &Client, product_id: i32) -> Vec<StatusCode> {
    let (a, b, c, d) = tokio::join!(
        add_to_cart(client, product_id, 1),
        add_to_cart(client, product_id, 1),
        add_to_cart(client, product_id, 1),
        add_to_cart(client, product_id, 1),
    );
    vec![a.status(), b.status(), c.status(), d.status()]
}

// ============================================================================
// Validation Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_add_unknown_product_is_404() {
    let client = shopper_client();
    let resp = add_to_cart(&client, 999_999_999, 1).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_add_beyond_stock_is_conflict() {
    let pool = test_pool().await;
    let product = seed_product(&pool, Decimal::new(1000, 2), 2).await;

    let client = shopper_client();
    let resp = add_to_cart(&client, product.id, 3).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_add_quantity_out_of_range_is_422() {
    let pool = test_pool().await;
    let product = seed_product(&pool, Decimal::new(1000, 2), 10).await;

    let client = shopper_client();
    let resp = add_to_cart(&client, product.id, 0).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let resp = add_to_cart(&client, product.id, 100).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// ============================================================================
// Update & Remove Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_update_quantity() {
    let pool = test_pool().await;
    let product = seed_product(&pool, Decimal::new(1000, 2), 10).await;

    let client = shopper_client();
    let base_url = storefront_base_url();

    let resp = add_to_cart(&client, product.id, 2).await;
    let body: Value = resp.json().await.expect("Failed to parse cart view");
    let line_id = body["lines"][0]["id"].as_i64().expect("no line id");

    let resp = client
        .post(format!("{base_url}/cart/update"))
        .json(&json!({"line_id": line_id, "quantity": 5}))
        .send()
        .await
        .expect("Failed to post cart update");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse cart view");
    assert_eq!(body.get("item_count").and_then(Value::as_i64), Some(5));
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_update_to_zero_removes_line() {
    let pool = test_pool().await;
    let product = seed_product(&pool, Decimal::new(1000, 2), 10).await;

    let client = shopper_client();
    let base_url = storefront_base_url();

    let resp = add_to_cart(&client, product.id, 2).await;
    let body: Value = resp.json().await.expect("Failed to parse cart view");
    let line_id = body["lines"][0]["id"].as_i64().expect("no line id");

    let resp = client
        .post(format!("{base_url}/cart/update"))
        .json(&json!({"line_id": line_id, "quantity": 0}))
        .send()
        .await
        .expect("Failed to post cart update");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse cart view");
    assert!(body["lines"].as_array().expect("no lines").is_empty());
    assert_eq!(cart_total(&body), Decimal::ZERO);
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_remove_line() {
    let pool = test_pool().await;
    let product = seed_product(&pool, Decimal::new(1000, 2), 10).await;

    let client = shopper_client();
    let base_url = storefront_base_url();

    let resp = add_to_cart(&client, product.id, 1).await;
    let body: Value = resp.json().await.expect("Failed to parse cart view");
    let line_id = body["lines"][0]["id"].as_i64().expect("no line id");

    let resp = client
        .post(format!("{base_url}/cart/remove"))
        .json(&json!({"line_id": line_id}))
        .send()
        .await
        .expect("Failed to post cart remove");
    assert_eq!(resp.status(), StatusCode::OK);

    // Removing it again is a 404
    let resp = client
        .post(format!("{base_url}/cart/remove"))
        .json(&json!({"line_id": line_id}))
        .send()
        .await
        .expect("Failed to post cart remove");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Session Isolation Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_carts_are_isolated_per_session() {
    let pool = test_pool().await;
    let product = seed_product(&pool, Decimal::new(1000, 2), 10).await;

    let alice = shopper_client();
    let bob = shopper_client();
    let base_url = storefront_base_url();

    add_to_cart(&alice, product.id, 2).await;

    let resp = bob
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .expect("Failed to get cart");
    let body: Value = resp.json().await.expect("Failed to parse cart view");
    assert!(
        body["lines"].as_array().expect("no lines").is_empty(),
        "A new session must start with an empty cart"
    );
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_cart_count_badge() {
    let pool = test_pool().await;
    let product = seed_product(&pool, Decimal::new(1000, 2), 10).await;

    let client = shopper_client();
    let base_url = storefront_base_url();

    add_to_cart(&client, product.id, 4).await;

    let resp = client
        .get(format!("{base_url}/cart/count"))
        .send()
        .await
        .expect("Failed to get cart count");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse count");
    assert_eq!(body.get("count").and_then(Value::as_i64), Some(4));
}
