//! Product repository for database operations.
//!
//! The product table is the shop catalog. It also backs the cart's
//! [`Catalog`] lookup, which resolves every cart key in one query.
//!
//! Queries are checked at runtime (`query_as`) so the crate builds without a
//! live database or an offline query cache.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, instrument};

use cafe_core::{Catalog, LookupKeys, Price, ProductId};

use super::RepositoryError;
use crate::models::Product;

const PRODUCT_COLUMNS: &str = "id, name, slug, description, price, image, available, created_at, updated_at";

/// Internal row type for product queries.
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    slug: String,
    description: String,
    price: Decimal,
    image: Option<String>,
    available: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        if row.price.is_sign_negative() {
            return Err(RepositoryError::DataCorruption(format!(
                "negative price {} for product {}",
                row.price, row.id
            )));
        }

        Ok(Self {
            id: ProductId::new(row.id),
            name: row.name,
            slug: row.slug,
            description: row.description,
            price: Price::new(row.price),
            image: row.image,
            available: row.available,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_products(rows: Vec<ProductRow>) -> Result<Vec<Product>, RepositoryError> {
    rows.into_iter().map(Product::try_from).collect()
}

/// Parameters for creating or updating a product.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct NewProduct {
    /// Display name.
    pub name: String,
    /// Unique URL identifier; existing products are matched on it.
    pub slug: String,
    /// Long description.
    #[serde(default)]
    pub description: String,
    /// Unit price.
    pub price: Price,
    /// Image path under `/static`.
    #[serde(default)]
    pub image: Option<String>,
    /// Whether the product can be purchased.
    #[serde(default = "default_available")]
    pub available: bool,
}

const fn default_available() -> bool {
    true
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products that can be purchased, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list_available(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM storefront.product WHERE available ORDER BY name"
        ))
        .fetch_all(self.pool)
        .await?;

        debug!(count = rows.len(), "Listed available products");
        into_products(rows)
    }

    /// Get an available product by its slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn get_available_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM storefront.product WHERE slug = $1 AND available"
        ))
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    /// Get a product by its ID, available or not.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM storefront.product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    /// Get every product whose ID matches one of `keys`.
    ///
    /// Numeric keys use the primary key index. Opaque keys are compared
    /// against the ID's text form, which simply matches nothing for keys that
    /// are not IDs.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self, keys))]
    pub async fn get_by_keys(&self, keys: &LookupKeys) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = match keys {
            LookupKeys::Ids(ids) => {
                sqlx::query_as(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM storefront.product WHERE id = ANY($1)"
                ))
                .bind(ids)
                .fetch_all(self.pool)
                .await?
            }
            LookupKeys::Opaque(keys) => {
                sqlx::query_as(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM storefront.product WHERE id::text = ANY($1)"
                ))
                .bind(keys)
                .fetch_all(self.pool)
                .await?
            }
        };

        debug!(count = rows.len(), "Resolved cart products");
        into_products(rows)
    }

    /// Insert a product, or update the existing product with the same slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if another constraint is violated.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self, product), fields(slug = %product.slug))]
    pub async fn upsert(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        let row: ProductRow = sqlx::query_as(&format!(
            r"
            INSERT INTO storefront.product (name, slug, description, price, image, available)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (slug) DO UPDATE
            SET name = EXCLUDED.name,
                description = EXCLUDED.description,
                price = EXCLUDED.price,
                image = EXCLUDED.image,
                available = EXCLUDED.available,
                updated_at = NOW()
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(&product.name)
        .bind(&product.slug)
        .bind(&product.description)
        .bind(product.price.amount())
        .bind(&product.image)
        .bind(product.available)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_check_violation()
            {
                return RepositoryError::Conflict(format!("invalid product {}", product.slug));
            }
            RepositoryError::Database(e)
        })?;

        Product::try_from(row)
    }
}

impl Catalog for ProductRepository<'_> {
    type Product = Product;
    type Error = RepositoryError;

    async fn find_by_keys(&self, keys: &LookupKeys) -> Result<Vec<Product>, RepositoryError> {
        self.get_by_keys(keys).await
    }
}
