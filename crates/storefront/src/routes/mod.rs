//! HTTP route handlers for the storefront JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database ping)
//!
//! # Catalog
//! GET  /categories             - Active categories
//! GET  /products               - Product listing (?category=slug&featured=true)
//! GET  /products/:slug         - Product detail
//!
//! # Cart
//! GET  /cart                   - Cart contents with totals
//! GET  /cart/count             - Item count badge
//! POST /cart/add               - Add product {product_id, quantity}
//! POST /cart/update            - Set line quantity {line_id, quantity}
//! POST /cart/remove            - Remove line {line_id}
//!
//! # Checkout
//! POST /checkout               - Materialize an order from the cart
//!
//! # Orders
//! GET  /orders/:id             - Order detail (ownership-checked)
//! GET  /account/orders         - Order history (requires auth)
//! ```

pub mod cart;
pub mod checkout;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the storefront API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(products::categories))
        .route("/products", get(products::list))
        .route("/products/{slug}", get(products::detail))
        .route("/cart", get(cart::show))
        .route("/cart/count", get(cart::count))
        .route("/cart/add", post(cart::add))
        .route("/cart/update", post(cart::update))
        .route("/cart/remove", post(cart::remove))
        .route("/checkout", post(checkout::create))
        .route("/orders/{id}", get(orders::detail))
        .route("/account/orders", get(orders::history))
}
