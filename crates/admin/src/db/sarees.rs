//! Saree catalog management.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use silk_saree_core::{CategoryId, Saree, SareeId};

use super::RepositoryError;

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

/// Validated saree fields for inserts and updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SareeInput {
    pub category_id: Option<CategoryId>,
    pub name: String,
    pub price: Decimal,
    pub description: String,
    pub image_filename: String,
}

const SAREE_COLUMNS: &str =
    "id, category_id, name, price, description, image_filename, created_at, updated_at";

/// Repository for saree CRUD.
pub struct SareeRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SareeRepository<'a> {
    /// Create a new saree repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All sarees, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Saree>, RepositoryError> {
        let rows = sqlx::query_as::<_, SareeRow>(&format!(
            "SELECT {SAREE_COLUMNS} FROM shop.saree ORDER BY id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Saree::from).collect())
    }

    /// Get a saree by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: SareeId) -> Result<Option<Saree>, RepositoryError> {
        let row = sqlx::query_as::<_, SareeRow>(&format!(
            "SELECT {SAREE_COLUMNS} FROM shop.saree WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Saree::from))
    }

    /// Insert a saree.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category does not exist.
    /// Returns `RepositoryError::Database` for other failures.
    pub async fn create(&self, input: &SareeInput) -> Result<Saree, RepositoryError> {
        let row = sqlx::query_as::<_, SareeRow>(&format!(
            r"
            INSERT INTO shop.saree (category_id, name, price, description, image_filename)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {SAREE_COLUMNS}
            "
        ))
        .bind(input.category_id)
        .bind(&input.name)
        .bind(input.price)
        .bind(&input.description)
        .bind(&input.image_filename)
        .fetch_one(self.pool)
        .await
        .map_err(map_category_fk)?;

        Ok(row.into())
    }

    /// Replace every editable field of a saree.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the saree or category does not exist.
    /// Returns `RepositoryError::Database` for other failures.
    pub async fn update(&self, id: SareeId, input: &SareeInput) -> Result<Saree, RepositoryError> {
        let row = sqlx::query_as::<_, SareeRow>(&format!(
            r"
            UPDATE shop.saree
            SET category_id = $2,
                name = $3,
                price = $4,
                description = $5,
                image_filename = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {SAREE_COLUMNS}
            "
        ))
        .bind(id)
        .bind(input.category_id)
        .bind(&input.name)
        .bind(input.price)
        .bind(&input.description)
        .bind(&input.image_filename)
        .fetch_optional(self.pool)
        .await
        .map_err(map_category_fk)?;

        row.map(Saree::from).ok_or(RepositoryError::NotFound)
    }

    /// Delete a saree, returning its image file name so the caller can
    /// remove the file.
    ///
    /// Orders and checkouts keep their snapshot; their `saree_id` is nulled.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the saree does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: SareeId) -> Result<String, RepositoryError> {
        sqlx::query_scalar::<_, String>(
            "DELETE FROM shop.saree WHERE id = $1 RETURNING image_filename",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }
}

fn map_category_fk(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_foreign_key_violation()
    {
        return RepositoryError::NotFound;
    }
    RepositoryError::Database(e)
}
