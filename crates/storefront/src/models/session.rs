//! Session-related types.
//!
//! The cart itself is stored under the configurable key from
//! `StorefrontConfig::cart_session_key`; the keys here are fixed.

/// Fixed session keys.
pub mod keys {
    /// Key for the flash message shown after a cart form was rejected.
    pub const CART_NOTICE: &str = "cart_notice";
}
