//! Read-only catalog queries.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use silk_saree_core::{Category, CategoryId, Saree, SareeId, Slug};

use super::RepositoryError;

/// Raw `shop.saree` row.
#[derive(Debug, sqlx::FromRow)]
struct SareeRow {
    id: SareeId,
    category_id: Option<CategoryId>,
    name: String,
    price: Decimal,
    description: String,
    image_filename: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SareeRow> for Saree {
    fn from(row: SareeRow) -> Self {
        Self {
            id: row.id,
            category_id: row.category_id,
            name: row.name,
            price: row.price,
            description: row.description,
            image_filename: row.image_filename,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Raw `shop.category` row.
#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: CategoryId,
    name: String,
    slug: String,
    description: String,
    created_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            slug: Slug::from_stored(row.slug),
            description: row.description,
            created_at: row.created_at,
        }
    }
}

const SAREE_COLUMNS: &str =
    "id, category_id, name, price, description, image_filename, created_at, updated_at";

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

    /// All sarees, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_sarees(&self) -> Result<Vec<Saree>, RepositoryError> {
        let rows = sqlx::query_as::<_, SareeRow>(&format!(
            "SELECT {SAREE_COLUMNS} FROM shop.saree ORDER BY id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Saree::from).collect())
    }

    /// Sarees in one category, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_sarees_in_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Saree>, RepositoryError> {
        let rows = sqlx::query_as::<_, SareeRow>(&format!(
            "SELECT {SAREE_COLUMNS} FROM shop.saree WHERE category_id = $1 ORDER BY id DESC"
        ))
        .bind(category_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Saree::from).collect())
    }

    /// A single saree.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_saree(&self, id: SareeId) -> Result<Option<Saree>, RepositoryError> {
        let row = sqlx::query_as::<_, SareeRow>(&format!(
            "SELECT {SAREE_COLUMNS} FROM shop.saree WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Saree::from))
    }

    /// All categories, alphabetically.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r"
            SELECT id, name, slug, description, created_at
            FROM shop.category
            ORDER BY name
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    /// Look up a category by its slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_category_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Category>, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r"
            SELECT id, name, slug, description, created_at
            FROM shop.category
            WHERE slug = $1
            ",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Category::from))
    }
}
