//! Cart route handlers.
//!
//! The cart is stored in the visitor's session (see [`crate::cart`]). Form
//! posts mutate it and redirect back to the cart page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use cafe_core::{CartLine, ProductId};

use crate::cart::{CartSummary, SessionCart};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::models::{Product, session_keys};
use crate::state::AppState;

/// Smallest quantity accepted from the add-to-cart form.
pub const MIN_QUANTITY: i32 = 1;
/// Largest quantity accepted from the add-to-cart form.
pub const MAX_QUANTITY: i32 = 20;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub product_id: String,
    pub name: String,
    pub url: String,
    pub image: Option<String>,
    pub quantity: i32,
    pub unit_price: String,
    pub total_price: String,
}

impl From<CartLine<Product>> for CartLineView {
    fn from(line: CartLine<Product>) -> Self {
        Self {
            product_id: line.product.id.to_string(),
            url: line.product.url(),
            name: line.product.name,
            image: line.product.image,
            quantity: line.quantity,
            unit_price: line.unit_price.to_string(),
            total_price: line.total_price.to_string(),
        }
    }
}

/// Add-to-cart form data.
///
/// Fields are read as text so that a malformed quantity is rejected by
/// [`AddToCartForm::validate`] instead of failing the whole request.
#[derive(Debug, Default, Deserialize)]
pub struct AddToCartForm {
    #[serde(default)]
    pub quantity: Option<String>,
    /// Present and truthy when the quantity replaces the stored one.
    #[serde(default)]
    pub update: Option<String>,
}

/// A validated add-to-cart request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartAdd {
    pub quantity: i32,
    pub update_quantity: bool,
}

impl AddToCartForm {
    /// Validate the form: quantity is required and must lie in 1..=20.
    ///
    /// # Errors
    ///
    /// Returns a message for the visitor when the quantity is not acceptable.
    pub fn validate(&self) -> std::result::Result<CartAdd, String> {
        let quantity = match self.quantity.as_deref().map(str::trim) {
            None | Some("") => return Err("Quantity is required.".to_string()),
            Some(raw) => raw
                .parse::<i32>()
                .map_err(|_| "Quantity must be a whole number.".to_string())?,
        };

        if !(MIN_QUANTITY..=MAX_QUANTITY).contains(&quantity) {
            return Err(format!(
                "Quantity must be between {MIN_QUANTITY} and {MAX_QUANTITY}."
            ));
        }

        let update_quantity = self.update.as_deref().is_some_and(is_truthy);

        Ok(CartAdd {
            quantity,
            update_quantity,
        })
    }
}

/// Checkbox and hidden-input spellings of "true".
fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "on" | "1" | "yes"
    )
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub lines: Vec<CartLineView>,
    pub cart_summary: CartSummary,
    pub notice: Option<String>,
    pub max_quantity: i32,
}

/// Look up a product or answer 404.
async fn product_or_404(state: &AppState, product_id: ProductId) -> Result<Product> {
    state
        .products()
        .get_by_id(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))
}

/// Display cart page.
#[instrument(skip(state, session, cart))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    cart: SessionCart,
) -> Result<CartShowTemplate> {
    let lines = cart
        .lines(&state.products())
        .await?
        .into_iter()
        .map(CartLineView::from)
        .collect();

    let notice = session.remove::<String>(session_keys::CART_NOTICE).await?;

    Ok(CartShowTemplate {
        lines,
        cart_summary: cart.summary(),
        notice,
        max_quantity: MAX_QUANTITY,
    })
}

/// Add a product to the cart, or set its quantity when `update` is set.
///
/// An invalid form leaves the cart unchanged.
#[instrument(skip(state, session, cart, form), fields(product_id = %product_id))]
pub async fn add(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
    session: Session,
    mut cart: SessionCart,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect> {
    let product = product_or_404(&state, product_id).await?;

    match form.validate() {
        Ok(request) => {
            cart.cart_mut()
                .add(&product, request.quantity, request.update_quantity);
            cart.save().await?;

            let id = product.id.to_string();
            let quantity = request.quantity.to_string();
            let message = if request.update_quantity {
                "Updated quantity"
            } else {
                "Added product"
            };
            add_breadcrumb(
                "cart",
                message,
                Some(&[("product_id", id.as_str()), ("quantity", quantity.as_str())]),
            );
            tracing::info!(
                quantity = request.quantity,
                update = request.update_quantity,
                "Cart updated"
            );
        }
        Err(message) => {
            tracing::debug!(%message, "Rejected add-to-cart form");
            session.insert(session_keys::CART_NOTICE, message).await?;
        }
    }

    Ok(Redirect::to("/cart"))
}

/// Remove a product from the cart.
#[instrument(skip(state, cart), fields(product_id = %product_id))]
pub async fn remove(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
    mut cart: SessionCart,
) -> Result<Redirect> {
    let product = product_or_404(&state, product_id).await?;

    if cart.cart_mut().remove(&product) {
        cart.save().await?;
        tracing::info!("Removed product from cart");
    }

    Ok(Redirect::to("/cart"))
}

/// Delete the cart from the session.
#[instrument(skip(cart))]
pub async fn clear(cart: SessionCart) -> Result<Redirect> {
    cart.clear().await?;
    tracing::info!("Cart cleared");
    Ok(Redirect::to("/cart"))
}
