//! Integration tests for checkout and orders.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The storefront server running (cargo run -p paperleaf-storefront)
//!
//! Run with: cargo test -p paperleaf-integration-tests -- --ignored

use std::str::FromStr;

use paperleaf_integration_tests::{
    checkout_payload, seed_product, set_product_price, shopper_client, storefront_base_url,
    test_pool,
};
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde_json::{Value, json};

async fn add_to_cart(client: &Client, product_id: i32, quantity: i32) {
    let base_url = storefront_base_url();
    let resp = client
        .post(format!("{base_url}/cart/add"))
        .json(&json!({"product_id": product_id, "quantity": quantity}))
        .send()
        .await
        .expect("Failed to post cart add");
    assert_eq!(resp.status(), StatusCode::OK);
}

async fn checkout(client: &Client) -> reqwest::Response {
    let base_url = storefront_base_url();
    client
        .post(format!("{base_url}/checkout"))
        .json(&checkout_payload())
        .send()
        .await
        .expect("Failed to post checkout")
}

fn decimal_field(value: &Value, field: &str) -> Decimal {
    let raw = value
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_else(|| panic!("missing decimal field {field}"));
    Decimal::from_str(raw).expect("field is not a decimal")
}

// ============================================================================
// Checkout Flow Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_checkout_materializes_order_and_clears_cart() {
    let pool = test_pool().await;
    let product = seed_product(&pool, Decimal::new(1000, 2), 10).await;

    let client = shopper_client();
    let base_url = storefront_base_url();

    // Two adds for the same product merge into one line of three units
    add_to_cart(&client, product.id, 2).await;
    add_to_cart(&client, product.id, 1).await;

    let resp = checkout(&client).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.expect("Failed to parse order view");
    let lines = body.get("lines").and_then(Value::as_array).expect("no lines");
    assert_eq!(lines.len(), 1);

    let line = lines.first().expect("empty lines");
    assert_eq!(decimal_field(line, "price"), Decimal::new(1000, 2));
    assert_eq!(line.get("quantity").and_then(Value::as_i64), Some(3));
    assert_eq!(decimal_field(&body, "total_price"), Decimal::new(3000, 2));
    assert_eq!(
        body["order"].get("status").and_then(Value::as_str),
        Some("pending")
    );

    // The cart is gone; the next look allocates a fresh empty one
    let resp = client
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .expect("Failed to get cart");
    let cart: Value = resp.json().await.expect("Failed to parse cart view");
    assert!(cart["lines"].as_array().expect("no lines").is_empty());
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_double_submission_creates_one_order() {
    let pool = test_pool().await;
    let product = seed_product(&pool, Decimal::new(1000, 2), 10).await;

    let client = shopper_client();
    add_to_cart(&client, product.id, 1).await;

    let (first, second) = tokio::join!(checkout(&client), checkout(&client));
    let statuses = [first.status(), second.status()];

    assert_eq!(
        statuses.iter().filter(|s| **s == StatusCode::CREATED).count(),
        1,
        "Exactly one of two racing checkouts must create an order, got {statuses:?}"
    );
    assert!(
        statuses.contains(&StatusCode::BAD_REQUEST),
        "The losing checkout must see an empty cart, got {statuses:?}"
    );
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_checkout_empty_cart_is_400() {
    let client = shopper_client();
    let base_url = storefront_base_url();

    // Touch the cart endpoint so a session and empty cart exist
    let _ = client
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .expect("Failed to get cart");

    let resp = checkout(&client).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_checkout_invalid_payload_reports_fields() {
    let pool = test_pool().await;
    let product = seed_product(&pool, Decimal::new(1000, 2), 10).await;

    let client = shopper_client();
    let base_url = storefront_base_url();
    add_to_cart(&client, product.id, 1).await;

    let resp = client
        .post(format!("{base_url}/checkout"))
        .json(&json!({
            "first_name": "",
            "last_name": "Lovelace",
            "email": "not-an-email",
            "address": "1 Analytical Way",
            "postal_code": "10001",
            "city": "London"
        }))
        .send()
        .await
        .expect("Failed to post checkout");
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = resp.json().await.expect("Failed to parse error body");
    let fields = body.get("fields").and_then(Value::as_array).expect("no fields");
    let named: Vec<&str> = fields
        .iter()
        .filter_map(|f| f.get("field").and_then(Value::as_str))
        .collect();
    assert!(named.contains(&"first_name"));
    assert!(named.contains(&"email"));

    // Validation failure must leave the cart untouched
    let resp = client
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .expect("Failed to get cart");
    let cart: Value = resp.json().await.expect("Failed to parse cart view");
    assert_eq!(cart["lines"].as_array().expect("no lines").len(), 1);
}

// ============================================================================
// Price Snapshot Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_order_price_survives_catalog_change() {
    let pool = test_pool().await;
    let product = seed_product(&pool, Decimal::new(1000, 2), 10).await;

    let client = shopper_client();
    add_to_cart(&client, product.id, 1).await;

    let resp = checkout(&client).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.expect("Failed to parse order view");
    let order_id = body["order"]["id"].as_i64().expect("no order id");

    // Reprice the product after the sale
    set_product_price(&pool, product.id, Decimal::new(9900, 2)).await;

    let base_url = storefront_base_url();
    let resp = client
        .get(format!("{base_url}/orders/{order_id}"))
        .send()
        .await
        .expect("Failed to get order");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse order view");
    let line = body["lines"][0].clone();
    assert_eq!(
        decimal_field(&line, "price"),
        Decimal::new(1000, 2),
        "Order lines must keep the price paid, not the current price"
    );
}

// ============================================================================
// Order Access Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_unknown_order_is_404() {
    let client = shopper_client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/orders/999999999"))
        .send()
        .await
        .expect("Failed to get order");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_order_history_requires_login() {
    let client = shopper_client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/account/orders"))
        .send()
        .await
        .expect("Failed to get order history");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
