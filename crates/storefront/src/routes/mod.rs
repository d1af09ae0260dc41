//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                              - Redirect to the product list
//! GET  /health                        - Health check
//! GET  /health/ready                  - Readiness check (database)
//!
//! # Cart
//! GET  /cart                          - Cart page
//! POST /cart/add/{product_id}         - Add to cart or update quantity
//! POST /cart/remove/{product_id}      - Remove from cart
//! POST /cart/clear                    - Empty the cart
//!
//! # Products
//! GET  /cart/products                 - Product listing
//! GET  /cart/products/{slug}          - Product detail
//! ```
//!
//! Every mutating route answers with a redirect to `/cart`.

pub mod cart;
pub mod products;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{slug}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add/{product_id}", post(cart::add))
        .route("/remove/{product_id}", post(cart::remove))
        .route("/clear", post(cart::clear))
        .nest("/products", product_routes())
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/cart/products") }))
        .nest("/cart", cart_routes())
}
