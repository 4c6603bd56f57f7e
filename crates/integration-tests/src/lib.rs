//! Integration test helpers for Paperleaf.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p paperleaf-cli -- migrate
//!
//! # Start the storefront
//! cargo run -p paperleaf-storefront
//!
//! # Run integration tests
//! cargo test -p paperleaf-integration-tests -- --ignored
//! ```
//!
//! Tests talk to a running storefront over HTTP (with cookie-backed
//! sessions, so each client is an independent anonymous shopper) and seed
//! catalog fixtures directly through the database.

use reqwest::Client;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

/// Base URL for the storefront API (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Create an HTTP client with a cookie store.
///
/// Each client carries its own session cookie, so two clients act as two
/// distinct anonymous shoppers.
#[must_use]
pub fn shopper_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Connect to the storefront test database for fixture setup.
///
/// # Panics
///
/// Panics if `STOREFRONT_DATABASE_URL`/`DATABASE_URL` is unset or the
/// database is unreachable.
pub async fn test_pool() -> PgPool {
    let database_url = std::env::var("STOREFRONT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("STOREFRONT_DATABASE_URL must be set for integration tests");
    PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to test database")
}

/// A seeded catalog product.
#[derive(Debug, Clone)]
pub struct SeededProduct {
    pub id: i32,
    pub slug: String,
    pub category_slug: String,
}

/// Seed a category and an active product with the given price and stock.
///
/// Slugs are randomized so parallel tests never collide.
pub async fn seed_product(pool: &PgPool, price: Decimal, stock: i32) -> SeededProduct {
    let tag = Uuid::new_v4().simple().to_string();
    let slug = format!("test-book-{tag}");
    let category_slug = format!("test-category-{tag}");

    let category_id: i32 = sqlx::query_scalar(
        "INSERT INTO shop.categories (name, slug) VALUES ($1, $2) RETURNING id",
    )
    .bind(format!("Test Category {tag}"))
    .bind(&category_slug)
    .fetch_one(pool)
    .await
    .expect("Failed to seed category");

    let id: i32 = sqlx::query_scalar(
        "INSERT INTO shop.products \
         (category_id, name, slug, description, price, stock, is_featured, is_active) \
         VALUES ($1, $2, $3, $4, $5, $6, false, true) \
         RETURNING id",
    )
    .bind(category_id)
    .bind(format!("Test Book {tag}"))
    .bind(&slug)
    .bind("Seeded by integration tests")
    .bind(price)
    .bind(stock)
    .fetch_one(pool)
    .await
    .expect("Failed to seed product");

    SeededProduct {
        id,
        slug,
        category_slug,
    }
}

/// Change a seeded product's price, for price snapshot checks.
pub async fn set_product_price(pool: &PgPool, product_id: i32, price: Decimal) {
    sqlx::query("UPDATE shop.products SET price = $1 WHERE id = $2")
        .bind(price)
        .bind(product_id)
        .execute(pool)
        .await
        .expect("Failed to update product price");
}

/// A valid checkout payload for tests.
#[must_use]
pub fn checkout_payload() -> serde_json::Value {
    serde_json::json!({
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": "ada@example.com",
        "address": "1 Analytical Way",
        "postal_code": "10001",
        "city": "London"
    })
}
