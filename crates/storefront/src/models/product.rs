//! Catalog domain types.
//!
//! The catalog is read-only from the cart/checkout core's perspective:
//! products are referenced by cart and order lines but owned by the catalog.

use chrono::{DateTime, Utc};
use serde::Serialize;

use paperleaf_core::{CategoryId, Price, ProductId};

/// A product category.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Category {
    /// Unique category ID.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// URL slug (unique).
    pub slug: String,
    /// Longer description text.
    pub description: String,
    /// Whether the category is shown in the store.
    pub is_active: bool,
    /// When the category was created.
    pub created_at: DateTime<Utc>,
}

/// A textbook in the catalog.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Owning category, if any.
    pub category_id: Option<CategoryId>,
    /// Display name.
    pub name: String,
    /// URL slug (unique).
    pub slug: String,
    /// Full description.
    pub description: String,
    /// Short description shown in listings.
    pub short_description: String,
    /// Current price. Never negative.
    pub price: Price,
    /// Units currently in stock. Never negative.
    pub stock: i32,
    /// Whether the product is featured on the home page.
    pub is_featured: bool,
    /// Whether the product can be browsed and added to carts.
    pub is_active: bool,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}
