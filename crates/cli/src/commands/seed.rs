//! Seed the product catalog from a YAML file.
//!
//! The file holds a `products` list; each entry is upserted by slug, so
//! running the command twice leaves one row per product.
//!
//! ```yaml
//! products:
//!   - name: Espresso
//!     slug: espresso
//!     description: A short, strong coffee.
//!     price: "2.50"
//!     image: images/espresso.jpg
//! ```
//!
//! Prices are quoted so they are read as exact decimals.

use std::path::Path;

use serde::Deserialize;
use tracing::{error, info};

use cafe_storefront::db::{self, NewProduct, ProductRepository, RepositoryError};

use super::{CommandError, database_url};

/// Top-level layout of a products seed file.
#[derive(Debug, Deserialize)]
pub struct ProductsFile {
    pub products: Vec<NewProduct>,
}

/// Errors that can occur while seeding.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read {0}: {1}")]
    Read(String, #[source] std::io::Error),

    #[error("Invalid seed file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("{0} validation errors found")]
    Invalid(usize),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Check a parsed file before touching the database.
///
/// Returns one message per problem found.
#[must_use]
pub fn validate(file: &ProductsFile) -> Vec<String> {
    let mut errors = Vec::new();
    let mut seen = std::collections::HashSet::new();

    for (index, product) in file.products.iter().enumerate() {
        let label = format!("product #{} ({})", index + 1, product.slug);
        if product.name.trim().is_empty() {
            errors.push(format!("{label}: name is empty"));
        }
        if product.slug.trim().is_empty() {
            errors.push(format!("{label}: slug is empty"));
        } else if !product
            .slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            errors.push(format!("{label}: slug must be letters, digits, '-' or '_'"));
        }
        if product.price.amount().is_sign_negative() {
            errors.push(format!("{label}: price is negative"));
        }
        if !seen.insert(product.slug.as_str()) {
            errors.push(format!("{label}: duplicate slug"));
        }
    }

    errors
}

/// Upsert every product listed in `file_path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, fails validation,
/// or a database operation fails.
pub async fn products(file_path: &str) -> Result<(), SeedError> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(SeedError::FileNotFound(file_path.to_string()));
    }

    info!(path = %file_path, "Loading products from file");

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| SeedError::Read(file_path.to_string(), e))?;
    let file: ProductsFile = serde_yaml::from_str(&content)?;

    info!(products = file.products.len(), "Parsed seed file");

    let errors = validate(&file);
    if !errors.is_empty() {
        error!("Seed file validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(SeedError::Invalid(errors.len()));
    }

    let database_url = database_url()?;
    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let repo = ProductRepository::new(&pool);
    for product in &file.products {
        let saved = repo.upsert(product).await?;
        info!(id = %saved.id, slug = %saved.slug, "Upserted product");
    }

    info!("Seeding complete! {} products written", file.products.len());
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> ProductsFile {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_parse_defaults() {
        let file = parse(
            r#"
products:
  - name: Espresso
    slug: espresso
    price: "2.50"
"#,
        );

        let product = &file.products[0];
        assert_eq!(product.price.to_string(), "2.50");
        assert!(product.available);
        assert!(product.image.is_none());
        assert!(product.description.is_empty());
        assert!(validate(&file).is_empty());
    }

    #[test]
    fn test_validate_reports_problems() {
        let file = parse(
            r#"
products:
  - name: ""
    slug: latte
    price: "3.00"
  - name: Latte again
    slug: latte
    price: "-1.00"
  - name: Mocha
    slug: "mocha please"
    price: "3.50"
"#,
        );

        let errors = validate(&file);
        assert_eq!(errors.len(), 4);
        assert!(errors[0].contains("name is empty"));
        assert!(errors.iter().any(|e| e.contains("duplicate slug")));
        assert!(errors.iter().any(|e| e.contains("price is negative")));
        assert!(errors.iter().any(|e| e.contains("slug must be")));
    }

    #[test]
    fn test_bundled_seed_file_is_valid() {
        let content = include_str!("../../seed/products.yaml");
        let file = parse(content);
        assert!(!file.products.is_empty());
        assert!(validate(&file).is_empty());
    }
}
