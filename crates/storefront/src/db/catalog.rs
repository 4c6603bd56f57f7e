//! Catalog repository for product and category reads.
//!
//! The cart/checkout core only reads the catalog; writes happen through
//! external administration tooling.

use sqlx::{PgPool, QueryBuilder};

use paperleaf_core::{CategoryId, ProductId};

use super::RepositoryError;
use crate::models::product::{Category, Product};

const PRODUCT_COLUMNS: &str = "id, category_id, name, slug, description, short_description, \
     price, stock, is_featured, is_active, created_at, updated_at";

/// Repository for catalog reads.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List active categories, alphabetically.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, slug, description, is_active, created_at
             FROM shop.categories
             WHERE is_active
             ORDER BY name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// Get an active category by slug.
    ///
    /// Callers resolve a category filter through this first, so an unknown
    /// slug can be distinguished from a category with no products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_category_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Category>, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, slug, description, is_active, created_at
             FROM shop.categories
             WHERE slug = $1 AND is_active",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(category)
    }

    /// List active products, optionally filtered by category and/or the
    /// featured flag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_products(
        &self,
        category: Option<CategoryId>,
        featured_only: bool,
    ) -> Result<Vec<Product>, RepositoryError> {
        let mut query = QueryBuilder::new(format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.products WHERE is_active"
        ));

        if let Some(id) = category {
            query.push(" AND category_id = ");
            query.push_bind(id);
        }
        if featured_only {
            query.push(" AND is_featured");
        }
        query.push(" ORDER BY name");

        let products = query
            .build_query_as::<Product>()
            .fetch_all(self.pool)
            .await?;

        Ok(products)
    }

    /// Get an active product by ID.
    ///
    /// Inactive and missing products both return `None`: from the cart's
    /// perspective an inactive product does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_active_product(
        &self,
        id: ProductId,
    ) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.products WHERE id = $1 AND is_active"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Get an active product by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_product_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.products WHERE slug = $1 AND is_active"
        ))
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }
}
