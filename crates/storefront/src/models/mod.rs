//! Domain models for the storefront.
//!
//! Row-backed types for the catalog, carts, and orders, plus the shopper
//! identity value threaded through every cart and checkout operation.

pub mod cart;
pub mod identity;
pub mod order;
pub mod product;
