//! Order domain types.
//!
//! An order is an immutable snapshot materialized from a cart at checkout.
//! Line prices are copied from the catalog at order time and never
//! re-derived; the only permitted later mutation is the status column.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use paperleaf_core::{Email, OrderId, OrderLineId, OrderStatus, Price, ProductId, UserId};

/// A placed order.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Owning user; `None` for guest checkout.
    pub user_id: Option<UserId>,
    /// Customer first name.
    pub first_name: String,
    /// Customer last name.
    pub last_name: String,
    /// Contact email.
    pub email: Email,
    /// Shipping street address.
    pub address: String,
    /// Shipping postal code.
    pub postal_code: String,
    /// Shipping city.
    pub city: String,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
    /// When the order was last updated (status changes only).
    pub updated_at: DateTime<Utc>,
}

/// One line of an order.
///
/// The price is a snapshot taken at checkout; the product reference exists
/// for traceability only.
#[derive(Debug, Clone, Serialize)]
pub struct OrderLine {
    /// Unique line ID.
    pub id: OrderLineId,
    /// Order this line belongs to.
    pub order_id: OrderId,
    /// Product the line was created from.
    pub product_id: ProductId,
    /// Unit price at order time.
    pub price: Price,
    /// Units ordered.
    pub quantity: i32,
}

impl OrderLine {
    /// The total for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.amount() * Decimal::from(self.quantity)
    }
}

/// An order with its lines and computed total.
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    /// The order.
    pub order: Order,
    /// Snapshotted lines.
    pub lines: Vec<OrderLine>,
    /// Sum of line totals.
    pub total_price: Decimal,
}

impl OrderView {
    /// Build a view, computing the order total.
    #[must_use]
    pub fn new(order: Order, lines: Vec<OrderLine>) -> Self {
        let total_price = lines.iter().map(OrderLine::line_total).sum();
        Self {
            order,
            lines,
            total_price,
        }
    }
}

/// Validated contact and shipping details for checkout.
///
/// Produced by checkout payload validation; field bounds match the
/// database columns.
#[derive(Debug, Clone)]
pub struct ContactDetails {
    /// Customer first name (non-empty, at most 50 characters).
    pub first_name: String,
    /// Customer last name (non-empty, at most 50 characters).
    pub last_name: String,
    /// Contact email.
    pub email: Email,
    /// Street address (non-empty, at most 250 characters).
    pub address: String,
    /// Postal code (non-empty, at most 20 characters).
    pub postal_code: String,
    /// City (non-empty, at most 100 characters).
    pub city: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn order_line(cents: i64, quantity: i32) -> OrderLine {
        OrderLine {
            id: OrderLineId::new(1),
            order_id: OrderId::new(1),
            product_id: ProductId::new(1),
            price: Price::from_cents(cents).unwrap(),
            quantity,
        }
    }

    #[test]
    fn test_line_total() {
        assert_eq!(order_line(1000, 3).line_total(), Decimal::new(3000, 2));
    }

    #[test]
    fn test_view_total() {
        let order = Order {
            id: OrderId::new(1),
            user_id: None,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: Email::parse("ada@example.com").unwrap(),
            address: "1 Analytical Way".to_string(),
            postal_code: "10001".to_string(),
            city: "London".to_string(),
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let view = OrderView::new(order, vec![order_line(1000, 3), order_line(500, 1)]);
        assert_eq!(view.total_price, Decimal::new(3500, 2));
    }
}
