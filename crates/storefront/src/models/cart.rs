//! Cart domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use paperleaf_core::{CartId, CartLineId, Price, ProductId, UserId};

/// A shopper's cart.
///
/// Owned by exactly one of a user or an anonymous session token; the
/// database enforces both the exclusivity check and cart-per-owner
/// uniqueness.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Cart {
    /// Unique cart ID.
    pub id: CartId,
    /// Owning user, for authenticated shoppers.
    pub user_id: Option<UserId>,
    /// Owning session token, for anonymous shoppers.
    pub session_token: Option<Uuid>,
    /// When the cart was created.
    pub created_at: DateTime<Utc>,
    /// When the cart was last touched.
    pub updated_at: DateTime<Utc>,
}

/// One (product, quantity) line in a cart.
///
/// At most one line exists per (cart, product) pair; repeat adds merge
/// into the existing line. The stored quantity is at least 1 and may
/// exceed the per-request maximum through merging.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CartLine {
    /// Unique line ID.
    pub id: CartLineId,
    /// Cart this line belongs to.
    pub cart_id: CartId,
    /// Referenced product.
    pub product_id: ProductId,
    /// Units of the product in the cart.
    pub quantity: i32,
    /// When the line was first created.
    pub created_at: DateTime<Utc>,
    /// When the quantity was last changed.
    pub updated_at: DateTime<Utc>,
}

/// A cart line joined with live product data, for display.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CartLineView {
    /// Line ID (used for update/remove requests).
    pub id: CartLineId,
    /// Referenced product.
    pub product_id: ProductId,
    /// Product name.
    pub name: String,
    /// Product slug.
    pub slug: String,
    /// Current unit price.
    pub unit_price: Price,
    /// Units in the cart.
    pub quantity: i32,
}

impl CartLineView {
    /// The current total for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price.amount() * Decimal::from(self.quantity)
    }
}

/// Cart contents with totals, as returned to view collaborators.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    /// Cart ID.
    pub cart_id: CartId,
    /// Lines with product details.
    pub lines: Vec<CartLineView>,
    /// Sum of line totals.
    pub total_price: Decimal,
    /// Total units across all lines.
    pub item_count: i64,
}

impl CartView {
    /// Build a view from joined lines, computing totals.
    #[must_use]
    pub fn new(cart_id: CartId, lines: Vec<CartLineView>) -> Self {
        let total_price = lines.iter().map(CartLineView::line_total).sum();
        let item_count = lines.iter().map(|l| i64::from(l.quantity)).sum();
        Self {
            cart_id,
            lines,
            total_price,
            item_count,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(id: i32, product_id: i32, cents: i64, quantity: i32) -> CartLineView {
        CartLineView {
            id: CartLineId::new(id),
            product_id: ProductId::new(product_id),
            name: format!("Book {product_id}"),
            slug: format!("book-{product_id}"),
            unit_price: Price::from_cents(cents).unwrap(),
            quantity,
        }
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line(1, 1, 1000, 3).line_total(), Decimal::new(3000, 2));
    }

    #[test]
    fn test_view_totals() {
        let view = CartView::new(CartId::new(1), vec![line(1, 1, 1000, 3), line(2, 2, 2550, 2)]);
        assert_eq!(view.total_price, Decimal::new(8100, 2));
        assert_eq!(view.item_count, 5);
    }

    #[test]
    fn test_empty_view() {
        let view = CartView::new(CartId::new(1), Vec::new());
        assert_eq!(view.total_price, Decimal::ZERO);
        assert_eq!(view.item_count, 0);
    }
}
