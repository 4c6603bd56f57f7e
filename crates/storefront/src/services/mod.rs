//! Service layer: cart aggregate, order materializer, and order access.
//!
//! Services hold the business rules (validation, stock checks, ownership,
//! status transitions) and delegate persistence to the repositories in
//! [`crate::db`].

pub mod cart;
pub mod checkout;
pub mod orders;

pub use cart::{CartError, CartService};
pub use checkout::{CheckoutError, CheckoutService, ContactForm, FieldError};
pub use orders::{OrderError, OrderService};
