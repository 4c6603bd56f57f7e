//! Cart repository.
//!
//! Cart creation and line insertion are both unique-constraint-guarded
//! upserts rather than read-then-write sequences, so concurrent requests
//! from the same shopper (double-clicks, parallel tabs) cannot create
//! duplicate carts or duplicate lines.

use sqlx::PgPool;

use paperleaf_core::{CartId, CartLineId, ProductId, Quantity};

use super::RepositoryError;
use crate::models::cart::{Cart, CartLine, CartLineView};
use crate::models::identity::ShopperIdentity;

const CART_COLUMNS: &str = "id, user_id, session_token, created_at, updated_at";
const LINE_COLUMNS: &str = "id, cart_id, product_id, quantity, created_at, updated_at";

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get or create the cart for an owner key.
    ///
    /// Idempotent per owner: the partial unique indexes on `user_id` and
    /// `session_token` turn this into a single upsert, so concurrent calls
    /// for the same owner all land on one cart row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_or_create(
        &self,
        owner: &ShopperIdentity,
    ) -> Result<Cart, RepositoryError> {
        let cart = match owner {
            ShopperIdentity::User(user_id) => {
                sqlx::query_as::<_, Cart>(&format!(
                    "INSERT INTO shop.carts (user_id)
                     VALUES ($1)
                     ON CONFLICT (user_id) WHERE user_id IS NOT NULL
                     DO UPDATE SET updated_at = now()
                     RETURNING {CART_COLUMNS}"
                ))
                .bind(user_id)
                .fetch_one(self.pool)
                .await?
            }
            ShopperIdentity::Anonymous(token) => {
                sqlx::query_as::<_, Cart>(&format!(
                    "INSERT INTO shop.carts (session_token)
                     VALUES ($1)
                     ON CONFLICT (session_token) WHERE session_token IS NOT NULL
                     DO UPDATE SET updated_at = now()
                     RETURNING {CART_COLUMNS}"
                ))
                .bind(token)
                .fetch_one(self.pool)
                .await?
            }
        };

        Ok(cart)
    }

    /// List the raw lines of a cart, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines(&self, cart_id: CartId) -> Result<Vec<CartLine>, RepositoryError> {
        let lines = sqlx::query_as::<_, CartLine>(&format!(
            "SELECT {LINE_COLUMNS} FROM shop.cart_lines WHERE cart_id = $1 ORDER BY id"
        ))
        .bind(cart_id)
        .fetch_all(self.pool)
        .await?;

        Ok(lines)
    }

    /// List cart lines joined with live product data.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn line_views(
        &self,
        cart_id: CartId,
    ) -> Result<Vec<CartLineView>, RepositoryError> {
        let lines = sqlx::query_as::<_, CartLineView>(
            "SELECT cl.id, cl.product_id, p.name, p.slug,
                    p.price AS unit_price, cl.quantity
             FROM shop.cart_lines cl
             JOIN shop.products p ON p.id = cl.product_id
             WHERE cl.cart_id = $1
             ORDER BY cl.id",
        )
        .bind(cart_id)
        .fetch_all(self.pool)
        .await?;

        Ok(lines)
    }

    /// Add a product to a cart, merging into an existing line for the same
    /// product.
    ///
    /// The `(cart_id, product_id)` unique constraint makes this a single
    /// upsert: a new line is created with the requested quantity, or an
    /// existing line's quantity is incremented by it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails (including
    /// foreign key violations for unknown products).
    pub async fn upsert_line(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: Quantity,
    ) -> Result<CartLine, RepositoryError> {
        let line = sqlx::query_as::<_, CartLine>(&format!(
            "INSERT INTO shop.cart_lines (cart_id, product_id, quantity)
             VALUES ($1, $2, $3)
             ON CONFLICT (cart_id, product_id)
             DO UPDATE SET quantity = shop.cart_lines.quantity + EXCLUDED.quantity,
                           updated_at = now()
             RETURNING {LINE_COLUMNS}"
        ))
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity.as_i32())
        .fetch_one(self.pool)
        .await?;

        Ok(line)
    }

    /// Replace the stored quantity of a line. `quantity` must be positive;
    /// callers remove the line instead for zero or negative values.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line is not in this cart.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_line_quantity(
        &self,
        cart_id: CartId,
        line_id: CartLineId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE shop.cart_lines
             SET quantity = $1, updated_at = now()
             WHERE id = $2 AND cart_id = $3",
        )
        .bind(quantity)
        .bind(line_id)
        .bind(cart_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete a line from a cart.
    ///
    /// # Returns
    ///
    /// Returns `true` if the line was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_line(
        &self,
        cart_id: CartId,
        line_id: CartLineId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "DELETE FROM shop.cart_lines WHERE id = $1 AND cart_id = $2",
        )
        .bind(line_id)
        .bind(cart_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Repair pass: merge duplicate lines for the same product into the
    /// oldest line and delete the rest.
    ///
    /// The unique constraint prevents new duplicates, but rows created
    /// before it existed (or imported) are folded here before any cart
    /// read is returned to a caller.
    ///
    /// # Returns
    ///
    /// The number of duplicate lines removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the transaction fails.
    pub async fn merge_duplicate_lines(
        &self,
        cart_id: CartId,
    ) -> Result<u64, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "UPDATE shop.cart_lines cl
             SET quantity = dup.total, updated_at = now()
             FROM (
                 SELECT MIN(id) AS keeper_id, SUM(quantity) AS total
                 FROM shop.cart_lines
                 WHERE cart_id = $1
                 GROUP BY product_id
                 HAVING COUNT(*) > 1
             ) dup
             WHERE cl.id = dup.keeper_id",
        )
        .bind(cart_id)
        .execute(&mut *tx)
        .await?;

        let deleted = sqlx::query(
            "DELETE FROM shop.cart_lines cl
             USING (
                 SELECT MIN(id) AS keeper_id, product_id
                 FROM shop.cart_lines
                 WHERE cart_id = $1
                 GROUP BY product_id
                 HAVING COUNT(*) > 1
             ) dup
             WHERE cl.cart_id = $1
               AND cl.product_id = dup.product_id
               AND cl.id <> dup.keeper_id",
        )
        .bind(cart_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(deleted.rows_affected())
    }

    /// Count of units across all lines of a cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn item_count(&self, cart_id: CartId) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(quantity), 0) FROM shop.cart_lines WHERE cart_id = $1",
        )
        .bind(cart_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }
}
