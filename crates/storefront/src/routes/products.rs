//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tracing::instrument;

use crate::cart::{CartSummary, SessionCart};
use crate::error::{AppError, Result};
use crate::filters;
use crate::models::Product;
use crate::routes::cart::{MAX_QUANTITY, MIN_QUANTITY};
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image: Option<String>,
    pub url: String,
    /// Quantity of this product already in the visitor's cart.
    pub in_cart: Option<i32>,
}

impl ProductView {
    fn new(product: Product, cart: &SessionCart) -> Self {
        Self {
            id: product.id.to_string(),
            in_cart: cart.cart().quantity_of(product.id),
            url: product.url(),
            price: product.price.to_string(),
            slug: product.slug,
            name: product.name,
            description: product.description,
            image: product.image,
        }
    }
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductView>,
    pub cart_summary: CartSummary,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductView,
    pub cart_summary: CartSummary,
    pub min_quantity: i32,
    pub max_quantity: i32,
}

/// Display the available products.
#[instrument(skip(state, cart))]
pub async fn index(
    State(state): State<AppState>,
    cart: SessionCart,
) -> Result<ProductsIndexTemplate> {
    let products = state
        .products()
        .list_available()
        .await?
        .into_iter()
        .map(|product| ProductView::new(product, &cart))
        .collect();

    Ok(ProductsIndexTemplate {
        products,
        cart_summary: cart.summary(),
    })
}

/// Display a product with its add-to-cart form.
#[instrument(skip(state, cart))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    cart: SessionCart,
) -> Result<ProductShowTemplate> {
    let product = state
        .products()
        .get_available_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {slug}")))?;

    Ok(ProductShowTemplate {
        product: ProductView::new(product, &cart),
        cart_summary: cart.summary(),
        min_quantity: MIN_QUANTITY,
        max_quantity: MAX_QUANTITY,
    })
}
