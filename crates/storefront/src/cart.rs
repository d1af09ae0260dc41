//! Binding between the session cart and the visitor's session.
//!
//! The cart value itself lives in `cafe_core::cart`. This module decides
//! where it is stored: under one configurable key of the `tower-sessions`
//! session, which the session layer persists in `PostgreSQL`.
//!
//! A session is in one of two cart states: no value under the key (absent)
//! or a stored cart, possibly empty (present). Loading an absent cart stores
//! an empty one; [`SessionCart::clear`] deletes the key again.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tower_sessions::Session;
use tracing::instrument;

use cafe_core::{Cart, Catalog, Price};

use crate::error::AppError;
use crate::state::AppState;

/// A cart loaded from a session, written back with [`SessionCart::save`].
#[derive(Debug, Clone)]
pub struct SessionCart {
    session: Session,
    key: String,
    cart: Cart,
}

impl SessionCart {
    /// Load the cart stored under `key`, creating an empty one if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read or written, or
    /// the stored value is not a cart.
    #[instrument(skip(session))]
    pub async fn load(session: Session, key: &str) -> Result<Self, tower_sessions::session::Error> {
        let cart = if let Some(cart) = session.get::<Cart>(key).await? {
            cart
        } else {
            let cart = Cart::new();
            session.insert(key, &cart).await?;
            tracing::debug!("Created empty cart");
            cart
        };

        Ok(Self {
            session,
            key: key.to_string(),
            cart,
        })
    }

    /// The loaded cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Mutable access to the loaded cart; call [`SessionCart::save`] afterwards.
    pub const fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    /// Write the cart back to the session if it changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store rejects the write.
    pub async fn save(&mut self) -> Result<(), tower_sessions::session::Error> {
        if self.cart.is_modified() {
            self.session.insert(&self.key, &self.cart).await?;
            self.cart.mark_saved();
        }
        Ok(())
    }

    /// Delete the cart from the session entirely.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read.
    pub async fn clear(self) -> Result<(), tower_sessions::session::Error> {
        self.session.remove_value(&self.key).await?;
        Ok(())
    }

    /// Header summary of the cart.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        CartSummary::from(&self.cart)
    }

    /// Resolve the cart lines against `catalog`, collecting them for display.
    ///
    /// # Errors
    ///
    /// Returns the catalog's error if the batch lookup fails.
    pub async fn lines<C: Catalog + Sync>(
        &self,
        catalog: &C,
    ) -> Result<Vec<cafe_core::CartLine<C::Product>>, C::Error> {
        Ok(self.cart.lines(catalog).await?.collect())
    }
}

/// Item count and total shown on every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartSummary {
    /// Total number of units.
    pub count: i64,
    /// Total price of all stored entries.
    pub total: Price,
}

impl From<&Cart> for CartSummary {
    fn from(cart: &Cart) -> Self {
        Self {
            count: cart.len(),
            total: cart.total_price(),
        }
    }
}

impl FromRequestParts<AppState> for SessionCart {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        Ok(Self::load(session, &state.config().cart_session_key).await?)
    }
}
