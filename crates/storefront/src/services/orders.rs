//! Order access and status lifecycle.
//!
//! Checkout creates orders; this service owns everything after that:
//! ownership-checked reads, order history, and the status state machine
//! consumed by external order management.

use sqlx::PgPool;
use thiserror::Error;

use paperleaf_core::{OrderId, OrderStatus, UserId};

use crate::db::RepositoryError;
use crate::db::orders::OrderRepository;
use crate::models::identity::ShopperIdentity;
use crate::models::order::{Order, OrderView};

/// Errors from order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Order does not exist.
    #[error("order not found")]
    NotFound,

    /// The requester does not own this order.
    #[error("not permitted to view this order")]
    Forbidden,

    /// The requested status change is not a legal transition.
    #[error("cannot transition order from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: OrderStatus,
        /// Requested status.
        to: OrderStatus,
    },

    /// Storage-layer failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Order service.
pub struct OrderService<'a> {
    orders: OrderRepository<'a>,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            orders: OrderRepository::new(pool),
        }
    }

    /// Get an order with its lines, enforcing ownership.
    ///
    /// User-owned orders are visible only to their owner. Guest orders
    /// (no owning user) are visible to any requester holding the order ID;
    /// the ID is only handed out at guest checkout.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` for a missing order.
    /// Returns `OrderError::Forbidden` for an ownership mismatch.
    /// Returns `OrderError::Repository` on storage failure.
    pub async fn get_order(
        &self,
        order_id: OrderId,
        identity: &ShopperIdentity,
    ) -> Result<OrderView, OrderError> {
        let order = self.orders.get(order_id).await?.ok_or(OrderError::NotFound)?;

        if let Some(owner) = order.user_id
            && identity.user_id() != Some(owner)
        {
            return Err(OrderError::Forbidden);
        }

        let lines = self.orders.lines(order_id).await?;
        Ok(OrderView::new(order, lines))
    }

    /// List a user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` on storage failure.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, OrderError> {
        Ok(self.orders.list_for_user(user_id).await?)
    }

    /// Apply a status transition.
    ///
    /// Rejects transitions the lifecycle forbids; the write itself is
    /// conditional on the status read here, so a concurrent administrative
    /// change surfaces as a conflict rather than a lost update.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` for a missing order.
    /// Returns `OrderError::InvalidTransition` for an illegal transition.
    /// Returns `OrderError::Repository` on storage failure or a concurrent
    /// status change.
    pub async fn set_status(
        &self,
        order_id: OrderId,
        next: OrderStatus,
    ) -> Result<(), OrderError> {
        let order = self.orders.get(order_id).await?.ok_or(OrderError::NotFound)?;

        if !order.status.can_transition_to(next) {
            return Err(OrderError::InvalidTransition {
                from: order.status,
                to: next,
            });
        }

        self.orders.update_status(order_id, order.status, next).await?;

        tracing::info!(
            order_id = %order_id,
            from = %order.status,
            to = %next,
            "order status changed"
        );

        Ok(())
    }
}
