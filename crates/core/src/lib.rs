//! Cafe Core - Shared types and the session cart.
//!
//! This crate provides the pieces used by every Cafe component:
//! - `storefront` - Public-facing shop with the session cart
//! - `cli` - Command-line tools for migrations and catalog seeding
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP. The cart is a plain value: callers load it from wherever it is
//! persisted, mutate it, and write it back when [`Cart::is_modified`] says so.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and prices
//! - [`cart`] - Session cart value object and the catalog lookup trait

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{Cart, CartItem, CartLine, CartLines, Catalog, LookupKeys, Purchasable};
pub use types::*;
