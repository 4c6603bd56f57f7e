//! Order repository.
//!
//! Order creation is the one multi-row transaction in the core: one order
//! row, a snapshot copy of every cart line, and the cart teardown must all
//! commit or roll back together.

use sqlx::PgPool;

use paperleaf_core::{CartId, OrderId, OrderLineId, OrderStatus, Price, ProductId, UserId};

use super::RepositoryError;
use crate::models::order::{ContactDetails, Order, OrderLine};

const ORDER_COLUMNS: &str = "id, user_id, first_name, last_name, email, address, \
     postal_code, city, status, created_at, updated_at";

/// Raw order line row. `price` and `quantity` are nullable in the schema
/// to admit malformed legacy imports; `into_line` rejects nulls.
#[derive(sqlx::FromRow)]
struct OrderLineRow {
    id: OrderLineId,
    order_id: OrderId,
    product_id: ProductId,
    price: Option<Price>,
    quantity: Option<i32>,
}

impl OrderLineRow {
    fn into_line(self) -> Result<OrderLine, RepositoryError> {
        let price = self.price.ok_or_else(|| {
            RepositoryError::DataCorruption(format!("order line {} has no price", self.id))
        })?;
        let quantity = self.quantity.ok_or_else(|| {
            RepositoryError::DataCorruption(format!("order line {} has no quantity", self.id))
        })?;

        Ok(OrderLine {
            id: self.id,
            order_id: self.order_id,
            product_id: self.product_id,
            price,
            quantity,
        })
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Materialize an order from a cart.
    ///
    /// In one transaction: inserts the order with status `pending`, moves
    /// the cart lines into order lines with a consuming `DELETE .. RETURNING`
    /// feeding the snapshot copy (price from the live product row at this
    /// moment), and deletes the cart itself so the next add-to-cart
    /// allocates a fresh one. Any failure rolls the whole sequence back -
    /// no orphan order, no partial lines.
    ///
    /// The consuming delete is what makes double submission safe: of two
    /// concurrent checkouts for one cart, the loser's delete waits on the
    /// winner's row locks, then removes zero rows, observes an empty
    /// snapshot, and rolls back. A plain `INSERT .. SELECT` would let both
    /// read the still-committed lines under READ COMMITTED and commit two
    /// orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if no cart lines were consumed
    /// (the cart was empty, or a concurrent checkout won the race).
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_from_cart(
        &self,
        cart_id: CartId,
        contact: &ContactDetails,
        user_id: Option<UserId>,
    ) -> Result<(Order, Vec<OrderLine>), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, Order>(&format!(
            "INSERT INTO shop.orders
                 (user_id, first_name, last_name, email, address, postal_code, city)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(&contact.first_name)
        .bind(&contact.last_name)
        .bind(&contact.email)
        .bind(&contact.address)
        .bind(&contact.postal_code)
        .bind(&contact.city)
        .fetch_one(&mut *tx)
        .await?;

        // Consuming snapshot copy: the delete and the insert are one
        // statement, so a line can be turned into an order line exactly
        // once. Price comes from the live product row at this moment and
        // is never re-derived afterwards.
        let rows = sqlx::query_as::<_, OrderLineRow>(
            "WITH removed AS (
                 DELETE FROM shop.cart_lines
                 WHERE cart_id = $2
                 RETURNING id, product_id, quantity
             )
             INSERT INTO shop.order_lines (order_id, product_id, price, quantity)
             SELECT $1, r.product_id, p.price, r.quantity
             FROM removed r
             JOIN shop.products p ON p.id = r.product_id
             ORDER BY r.id
             RETURNING id, order_id, product_id, price, quantity",
        )
        .bind(order.id)
        .bind(cart_id)
        .fetch_all(&mut *tx)
        .await?;

        if rows.is_empty() {
            // Implicit rollback on drop
            return Err(RepositoryError::Conflict("cart is empty".to_owned()));
        }

        let lines = rows
            .into_iter()
            .map(OrderLineRow::into_line)
            .collect::<Result<Vec<_>, _>>()?;

        sqlx::query("DELETE FROM shop.carts WHERE id = $1")
            .bind(cart_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok((order, lines))
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(order)
    }

    /// Get the lines of an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if a line has a null price
    /// or quantity (repairable via `paperleaf-cli fix-order-lines`).
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn lines(&self, order_id: OrderId) -> Result<Vec<OrderLine>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderLineRow>(
            "SELECT id, order_id, product_id, price, quantity
             FROM shop.order_lines
             WHERE order_id = $1
             ORDER BY id",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(OrderLineRow::into_line).collect()
    }

    /// List a user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.orders
             WHERE user_id = $1
             ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// Write a new status, guarded by the expected current status.
    ///
    /// The conditional update prevents lost transitions under concurrent
    /// administrative writes: if the stored status no longer matches
    /// `expected`, nothing is written.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the stored status changed
    /// since it was read.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_status(
        &self,
        id: OrderId,
        expected: OrderStatus,
        next: OrderStatus,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE shop.orders
             SET status = $1, updated_at = now()
             WHERE id = $2 AND status = $3",
        )
        .bind(next)
        .bind(id)
        .bind(expected)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::Conflict(format!(
                "order {id} is no longer {expected}"
            )));
        }

        Ok(())
    }

    /// Data-repair pass for malformed legacy order lines: null prices are
    /// filled from the current product price, null quantities become 1.
    ///
    /// Normal-path writes never produce such rows; this exists for
    /// imported data and is invoked from the CLI.
    ///
    /// # Returns
    ///
    /// The number of lines repaired.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the transaction fails.
    pub async fn repair_lines(&self) -> Result<u64, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let priced = sqlx::query(
            "UPDATE shop.order_lines ol
             SET price = p.price
             FROM shop.products p
             WHERE ol.product_id = p.id AND ol.price IS NULL",
        )
        .execute(&mut *tx)
        .await?;

        let quantified = sqlx::query(
            "UPDATE shop.order_lines SET quantity = 1 WHERE quantity IS NULL",
        )
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(priced.rows_affected() + quantified.rows_affected())
    }
}
