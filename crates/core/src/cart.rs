//! Session cart.
//!
//! A [`Cart`] records which products a visitor picked, how many of each, and
//! the unit price at the moment each product was first added. It lives in the
//! visitor's session, not in a database table, so it is a plain serializable
//! value: load it, mutate it, and persist it again when [`Cart::is_modified`]
//! reports a change.
//!
//! Products are resolved against a [`Catalog`] only when the cart is
//! displayed. All keys go to the catalog in one batch, and entries whose
//! product no longer exists are skipped from the displayed lines while staying
//! in the stored cart.
//!
//! ```rust
//! use cafe_core::{Cart, Price, ProductId, Purchasable};
//!
//! struct Beans;
//!
//! impl Purchasable for Beans {
//!     fn product_id(&self) -> ProductId {
//!         ProductId::new(1)
//!     }
//!     fn price(&self) -> Price {
//!         Price::from_cents(450)
//!     }
//! }
//!
//! let mut cart = Cart::new();
//! cart.add(&Beans, 2, false);
//! assert_eq!(cart.len(), 2);
//! assert_eq!(cart.total_price(), Price::from_cents(900));
//! ```

use std::collections::HashMap;
use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// Anything that can be put in a cart.
pub trait Purchasable {
    /// Catalog identifier of the product.
    fn product_id(&self) -> ProductId;

    /// Current unit price of the product.
    fn price(&self) -> Price;
}

/// Batch of cart keys for a single catalog lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupKeys {
    /// Every key parsed as a product id.
    Ids(Vec<ProductId>),
    /// At least one key was not a valid id; every key is passed as text.
    Opaque(Vec<String>),
}

impl LookupKeys {
    /// Whether there is nothing to look up.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Ids(ids) => ids.is_empty(),
            Self::Opaque(keys) => keys.is_empty(),
        }
    }
}

/// External store of purchasable products.
pub trait Catalog {
    /// Product record returned by the catalog.
    type Product: Purchasable;

    /// Lookup failure.
    type Error;

    /// Return the products matching `keys`, in any order.
    ///
    /// Keys with no matching product are simply absent from the result.
    fn find_by_keys(
        &self,
        keys: &LookupKeys,
    ) -> impl Future<Output = Result<Vec<Self::Product>, Self::Error>> + Send;
}

/// One stored cart entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product id as text, unique within the cart.
    pub product_id: String,
    /// Number of units.
    pub quantity: i32,
    /// Unit price captured when the product was first added.
    pub unit_price: Price,
}

impl CartItem {
    /// Stored unit price times stored quantity.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// A cart entry joined with its catalog product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine<P> {
    pub product: P,
    pub unit_price: Price,
    pub quantity: i32,
    pub total_price: Price,
}

/// Session-scoped cart.
///
/// Entries keep insertion order. They are serialized as a JSON array because
/// the session store does not preserve key order in JSON objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
    #[serde(skip)]
    modified: bool,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            modified: false,
        }
    }

    /// Add `quantity` units of `product`, or set its quantity to `quantity`
    /// when `update_quantity` is true.
    ///
    /// The unit price is captured only the first time a product is added.
    /// Quantities are not validated here: a zero or negative delta is applied
    /// as given and the entry stays in the cart until removed.
    pub fn add(&mut self, product: &impl Purchasable, quantity: i32, update_quantity: bool) {
        let key = product.product_id().to_string();
        let index = match self.position(&key) {
            Some(index) => index,
            None => {
                self.items.push(CartItem {
                    product_id: key,
                    quantity: 0,
                    unit_price: product.price(),
                });
                self.items.len() - 1
            }
        };

        if let Some(item) = self.items.get_mut(index) {
            item.quantity = if update_quantity {
                quantity
            } else {
                item.quantity.saturating_add(quantity)
            };
        }
        self.modified = true;
    }

    /// Remove `product` from the cart.
    ///
    /// Returns `false` (and leaves the cart untouched) if it was not there.
    pub fn remove(&mut self, product: &impl Purchasable) -> bool {
        let key = product.product_id().to_string();
        let Some(index) = self.position(&key) else {
            return false;
        };
        self.items.remove(index);
        self.modified = true;
        true
    }

    /// Total number of units across all stored entries.
    #[must_use]
    pub fn len(&self) -> i64 {
        self.items.iter().map(|item| i64::from(item.quantity)).sum()
    }

    /// Whether the cart has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of stored unit price times quantity over every entry.
    ///
    /// Uses stored prices only, so entries whose product has left the catalog
    /// still count.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.items.iter().map(CartItem::total_price).sum()
    }

    /// Stored entries in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Quantity stored for `product_id`, if present.
    #[must_use]
    pub fn quantity_of(&self, product_id: ProductId) -> Option<i32> {
        let key = product_id.to_string();
        self.items
            .iter()
            .find(|item| item.product_id == key)
            .map(|item| item.quantity)
    }

    /// Keys to resolve against the catalog in one batch.
    ///
    /// Falls back to passing every key as text when any key is not the
    /// canonical text of a product id (`"4"`, not `"04"` or `"+4"`), so a
    /// malformed key never fails the whole lookup. Lines are matched on the
    /// same text, so a non-canonical key never resolves.
    #[must_use]
    pub fn lookup_keys(&self) -> LookupKeys {
        let ids: Option<Vec<ProductId>> = self
            .items
            .iter()
            .map(|item| canonical_id(&item.product_id))
            .collect();

        ids.map_or_else(
            || {
                LookupKeys::Opaque(
                    self.items
                        .iter()
                        .map(|item| item.product_id.clone())
                        .collect(),
                )
            },
            LookupKeys::Ids,
        )
    }

    /// Join stored entries with already-resolved `products`.
    ///
    /// Yields lines lazily in cart order. Entries without a matching product
    /// are skipped. The stored entries are not modified.
    pub fn materialize<P: Purchasable>(&self, products: Vec<P>) -> CartLines<'_, P> {
        let products = products
            .into_iter()
            .map(|product| (product.product_id().to_string(), product))
            .collect();

        CartLines {
            items: self.items.iter(),
            products,
        }
    }

    /// Resolve every entry against `catalog` with a single batch lookup.
    ///
    /// Each call re-reads the current entries, so the result reflects every
    /// mutation made before it.
    ///
    /// # Errors
    ///
    /// Returns the catalog's error if the lookup fails.
    pub async fn lines<C: Catalog + Sync>(
        &self,
        catalog: &C,
    ) -> Result<CartLines<'_, C::Product>, C::Error> {
        let keys = self.lookup_keys();
        let products = if keys.is_empty() {
            Vec::new()
        } else {
            catalog.find_by_keys(&keys).await?
        };
        Ok(self.materialize(products))
    }

    /// Whether the cart changed since it was loaded or last saved.
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    /// Record that the current state has been persisted.
    pub const fn mark_saved(&mut self) {
        self.modified = false;
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.items.iter().position(|item| item.product_id == key)
    }
}

/// Parse `key` only if it is exactly how that id is written back.
fn canonical_id(key: &str) -> Option<ProductId> {
    key.parse::<ProductId>()
        .ok()
        .filter(|id| id.to_string() == key)
}

/// Lazy iterator over resolved cart lines.
pub struct CartLines<'a, P> {
    items: std::slice::Iter<'a, CartItem>,
    products: HashMap<String, P>,
}

impl<P> Iterator for CartLines<'_, P> {
    type Item = CartLine<P>;

    fn next(&mut self) -> Option<Self::Item> {
        for item in self.items.by_ref() {
            if let Some(product) = self.products.remove(&item.product_id) {
                return Some(CartLine {
                    product,
                    unit_price: item.unit_price,
                    quantity: item.quantity,
                    total_price: item.total_price(),
                });
            }
        }
        None
    }
}
