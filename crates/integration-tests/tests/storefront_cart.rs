//! Integration tests for the session cart.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (cafe-cli migrate)
//! - The sample catalog (cafe-cli seed products crates/cli/seed/products.yaml)
//! - The storefront server running (cargo run -p cafe-storefront)
//!
//! Run with: cargo test -p cafe-integration-tests -- --ignored

use cafe_integration_tests::TestContext;
use reqwest::StatusCode;

fn visitor() -> TestContext {
    TestContext::new().expect("Failed to create HTTP client")
}

async fn espresso_id(ctx: &TestContext) -> String {
    ctx.product_id("espresso")
        .await
        .expect("Failed to load product page")
        .expect("Product page has no add-to-cart form")
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_health_endpoints() {
    let ctx = visitor();

    let resp = ctx.get("/health").await.expect("Failed to get /health");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = ctx
        .get("/health/ready")
        .await
        .expect("Failed to get /health/ready");
    assert_eq!(resp.status(), StatusCode::OK);
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and seeded catalog"]
async fn test_product_listing_hides_unavailable() {
    let ctx = visitor();

    let resp = ctx.get("/").await.expect("Failed to get /");
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.url().path().starts_with("/cart/products"));

    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Espresso"));
    assert!(!body.contains("Seasonal Cold Brew"));

    let resp = ctx
        .get("/cart/products/seasonal-cold-brew")
        .await
        .expect("Failed to get product");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Cart
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and seeded catalog"]
async fn test_new_visitor_has_empty_cart() {
    let ctx = visitor();

    let body = ctx.cart_page().await.expect("Failed to get cart");
    assert!(body.contains("Your cart is empty"));
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded catalog"]
async fn test_add_accumulates_then_update_replaces() {
    let ctx = visitor();
    let id = espresso_id(&ctx).await;
    let add = format!("/cart/add/{id}");

    let resp = ctx
        .post_form(&add, &[("quantity", "2"), ("update", "false")])
        .await
        .expect("Failed to add to cart");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.url().path(), "/cart");
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Cart: 2 items, $5.00"));

    ctx.post_form(&add, &[("quantity", "1")])
        .await
        .expect("Failed to add to cart");
    let body = ctx.cart_page().await.expect("Failed to get cart");
    assert!(body.contains("Cart: 3 items, $7.50"));

    ctx.post_form(&add, &[("quantity", "5"), ("update", "true")])
        .await
        .expect("Failed to update cart");
    let body = ctx.cart_page().await.expect("Failed to get cart");
    assert!(body.contains("Cart: 5 items, $12.50"));
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded catalog"]
async fn test_invalid_quantity_leaves_cart_unchanged() {
    let ctx = visitor();
    let id = espresso_id(&ctx).await;

    let resp = ctx
        .post_form(&format!("/cart/add/{id}"), &[("quantity", "21")])
        .await
        .expect("Failed to post form");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Quantity must be between 1 and 20."));
    assert!(body.contains("Your cart is empty"));

    // The notice is shown once.
    let body = ctx.cart_page().await.expect("Failed to get cart");
    assert!(!body.contains("Quantity must be between"));
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded catalog"]
async fn test_remove_and_clear() {
    let ctx = visitor();
    let espresso = espresso_id(&ctx).await;
    let croissant = ctx
        .product_id("croissant")
        .await
        .expect("Failed to load product page")
        .expect("Product page has no add-to-cart form");

    ctx.post_form(&format!("/cart/add/{espresso}"), &[("quantity", "1")])
        .await
        .expect("Failed to add to cart");
    ctx.post_form(&format!("/cart/add/{croissant}"), &[("quantity", "2")])
        .await
        .expect("Failed to add to cart");

    let resp = ctx
        .post_form(&format!("/cart/remove/{espresso}"), &[])
        .await
        .expect("Failed to remove from cart");
    assert_eq!(resp.url().path(), "/cart");
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Cart: 2 items, $5.80"));

    // Removing something that is not in the cart is harmless.
    let resp = ctx
        .post_form(&format!("/cart/remove/{espresso}"), &[])
        .await
        .expect("Failed to remove from cart");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = ctx
        .post_form("/cart/clear", &[])
        .await
        .expect("Failed to clear cart")
        .text()
        .await
        .expect("Failed to read response");
    assert!(body.contains("Your cart is empty"));
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded catalog"]
async fn test_carts_are_per_visitor() {
    let alice = visitor();
    let bob = visitor();
    let id = espresso_id(&alice).await;

    alice
        .post_form(&format!("/cart/add/{id}"), &[("quantity", "3")])
        .await
        .expect("Failed to add to cart");

    let body = bob.cart_page().await.expect("Failed to get cart");
    assert!(body.contains("Your cart is empty"));
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_unknown_or_malformed_product() {
    let ctx = visitor();

    let resp = ctx
        .post_form("/cart/add/999999999", &[("quantity", "1")])
        .await
        .expect("Failed to post form");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = ctx
        .post_form("/cart/remove/not-a-number", &[])
        .await
        .expect("Failed to post form");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
