//! Domain models for storefront.

pub mod product;
pub mod session;

pub use product::Product;
pub use session::keys as session_keys;
