//! Product domain type.
//!
//! Separate from the database row type so that handlers and templates only
//! ever see validated values.

use chrono::{DateTime, Utc};

use cafe_core::{Price, ProductId, Purchasable};

/// A sellable catalog product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// URL-safe unique identifier used in product URLs.
    pub slug: String,
    /// Long description shown on the detail page.
    pub description: String,
    /// Current unit price.
    pub price: Price,
    /// Image path under `/static`, if the product has one.
    pub image: Option<String>,
    /// Whether the product can currently be purchased.
    pub available: bool,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Canonical URL of the product detail page.
    #[must_use]
    pub fn url(&self) -> String {
        format!("/cart/products/{}", self.slug)
    }
}

impl Purchasable for Product {
    fn product_id(&self) -> ProductId {
        self.id
    }

    fn price(&self) -> Price {
        self.price
    }
}
