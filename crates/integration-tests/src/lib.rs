//! Integration tests for the Cafe storefront.
//!
//! The tests talk to a running storefront over HTTP with a cookie-keeping
//! client, so every [`TestContext`] is a separate visitor with its own cart.
//!
//! # Running Tests
//!
//! ```bash
//! cafe-cli migrate
//! cafe-cli seed products crates/cli/seed/products.yaml
//! cargo run -p cafe-storefront &
//! cargo test -p cafe-integration-tests -- --ignored
//! ```
//!
//! `STOREFRONT_BASE_URL` points the tests at another server
//! (default `http://localhost:3000`).

use reqwest::{Client, Response};

/// Default storefront address when `STOREFRONT_BASE_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Base URL for the storefront under test.
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
}

/// One visitor: an HTTP client with its own session cookie.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
}

impl TestContext {
    /// Create a visitor with an empty cookie jar.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new() -> reqwest::Result<Self> {
        let client = Client::builder().cookie_store(true).build()?;
        Ok(Self {
            client,
            base_url: storefront_base_url(),
        })
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET `path`, following redirects.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get(&self, path: &str) -> reqwest::Result<Response> {
        self.client.get(self.url(path)).send().await
    }

    /// POST a form to `path`, following redirects.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Result<Response> {
        self.client.post(self.url(path)).form(form).send().await
    }

    /// Body of the cart page.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn cart_page(&self) -> reqwest::Result<String> {
        self.get("/cart").await?.text().await
    }

    /// Product id from the add-to-cart form on a product page.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn product_id(&self, slug: &str) -> reqwest::Result<Option<String>> {
        let body = self
            .get(&format!("/cart/products/{slug}"))
            .await?
            .text()
            .await?;
        Ok(add_form_product_id(&body))
    }
}

/// Extract `{id}` from the first `action="/cart/add/{id}"` in a page.
#[must_use]
pub fn add_form_product_id(body: &str) -> Option<String> {
    const MARKER: &str = "action=\"/cart/add/";

    let start = body.find(MARKER)? + MARKER.len();
    let rest = body.get(start..)?;
    let end = rest.find('"')?;
    rest.get(..end).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_form_product_id() {
        let body = r#"<form action="/cart/add/42" method="post">"#;
        assert_eq!(add_form_product_id(body).as_deref(), Some("42"));
        assert_eq!(add_form_product_id("<p>no form</p>"), None);
    }
}
