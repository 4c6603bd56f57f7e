//! Request middleware: session layer and shopper identity extraction.

pub mod identity;
pub mod session;

pub use session::create_session_layer;
