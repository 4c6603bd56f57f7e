//! Cart service.
//!
//! Owns the cart aggregate rules: identity-to-cart resolution, stock
//! validation on add, quantity semantics on update, and the merge
//! invariant (at most one line per product).

use sqlx::PgPool;
use thiserror::Error;

use paperleaf_core::{CartLineId, ProductId, Quantity};

use crate::db::RepositoryError;
use crate::db::carts::CartRepository;
use crate::db::catalog::CatalogRepository;
use crate::models::cart::{Cart, CartLine, CartView};
use crate::models::identity::ShopperIdentity;

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Product or cart line does not exist (or the product is inactive).
    #[error("not found")]
    NotFound,

    /// Quantity outside the allowed per-request range.
    #[error("quantity must be between {min} and {max}", min = Quantity::MIN, max = Quantity::MAX)]
    InvalidQuantity,

    /// Requested more units than are in stock.
    #[error("only {available} in stock")]
    InsufficientStock {
        /// Units currently available.
        available: i32,
    },

    /// Storage-layer failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Cart service.
pub struct CartService<'a> {
    catalog: CatalogRepository<'a>,
    carts: CartRepository<'a>,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            catalog: CatalogRepository::new(pool),
            carts: CartRepository::new(pool),
        }
    }

    /// Resolve a shopper identity to its cart, creating one if needed.
    ///
    /// Idempotent per owner key; see [`CartRepository::get_or_create`].
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` on storage failure.
    pub async fn resolve_cart(&self, identity: &ShopperIdentity) -> Result<Cart, CartError> {
        Ok(self.carts.get_or_create(identity).await?)
    }

    /// Add a product to a cart.
    ///
    /// The product must exist and be active. The requested quantity must
    /// not exceed live stock - stock is validated here, not decremented
    /// (checkout re-validation is a separate, explicit design decision).
    /// A repeat add for the same product merges into the existing line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotFound` if the product is missing or inactive.
    /// Returns `CartError::InsufficientStock` if stock is too low.
    /// Returns `CartError::Repository` on storage failure.
    pub async fn add_line(
        &self,
        cart: &Cart,
        product_id: ProductId,
        quantity: Quantity,
    ) -> Result<CartLine, CartError> {
        let product = self
            .catalog
            .get_active_product(product_id)
            .await?
            .ok_or(CartError::NotFound)?;

        if quantity.as_i32() > product.stock {
            return Err(CartError::InsufficientStock {
                available: product.stock,
            });
        }

        let line = self.carts.upsert_line(cart.id, product_id, quantity).await?;

        tracing::debug!(
            cart_id = %cart.id,
            product_id = %product_id,
            quantity = %line.quantity,
            "cart line added"
        );

        Ok(line)
    }

    /// Replace a line's quantity. A quantity of zero or less removes the
    /// line. No stock re-check happens here, matching add-time-only
    /// validation semantics.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotFound` if the line is not in this cart.
    /// Returns `CartError::Repository` on storage failure.
    pub async fn set_line_quantity(
        &self,
        cart: &Cart,
        line_id: CartLineId,
        quantity: i32,
    ) -> Result<(), CartError> {
        if quantity <= 0 {
            return self.remove_line(cart, line_id).await;
        }

        match self.carts.set_line_quantity(cart.id, line_id, quantity).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => Err(CartError::NotFound),
            Err(e) => Err(CartError::Repository(e)),
        }
    }

    /// Remove a line from a cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotFound` if the line is not in this cart.
    /// Returns `CartError::Repository` on storage failure.
    pub async fn remove_line(&self, cart: &Cart, line_id: CartLineId) -> Result<(), CartError> {
        let deleted = self.carts.delete_line(cart.id, line_id).await?;
        if !deleted {
            return Err(CartError::NotFound);
        }
        Ok(())
    }

    /// The cart's contents with live product data and totals.
    ///
    /// Runs the duplicate-line repair pass first, so callers never observe
    /// two lines for one product. A merge is a repair event logged here,
    /// never an error surfaced to the caller.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` on storage failure.
    pub async fn contents(&self, cart: &Cart) -> Result<CartView, CartError> {
        let merged = self.carts.merge_duplicate_lines(cart.id).await?;
        if merged > 0 {
            tracing::warn!(
                cart_id = %cart.id,
                merged_lines = merged,
                "merged duplicate cart lines"
            );
        }

        let lines = self.carts.line_views(cart.id).await?;
        Ok(CartView::new(cart.id, lines))
    }

    /// Total units in the cart (for the cart badge).
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` on storage failure.
    pub async fn item_count(&self, cart: &Cart) -> Result<i64, CartError> {
        Ok(self.carts.item_count(cart.id).await?)
    }
}
