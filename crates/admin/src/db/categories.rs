//! Category management.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use silk_saree_core::{Category, CategoryId, Slug};

use super::RepositoryError;

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

/// Validated category fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryInput {
    pub name: String,
    pub slug: Slug,
    pub description: String,
}

/// A category with the number of sarees filed under it.
#[derive(Debug, Clone)]
pub struct CategoryWithCount {
    pub category: Category,
    pub saree_count: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct CategoryCountRow {
    #[sqlx(flatten)]
    category: CategoryRow,
    saree_count: i64,
}

/// Repository for category CRUD.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All categories, alphabetically.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, slug, description, created_at FROM shop.category ORDER BY name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    /// All categories with their saree counts, alphabetically.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_with_counts(&self) -> Result<Vec<CategoryWithCount>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryCountRow>(
            r"
            SELECT c.id, c.name, c.slug, c.description, c.created_at,
                   COUNT(s.id) AS saree_count
            FROM shop.category c
            LEFT JOIN shop.saree s ON s.category_id = c.id
            GROUP BY c.id
            ORDER BY c.name
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| CategoryWithCount {
                category: r.category.into(),
                saree_count: r.saree_count,
            })
            .collect())
    }

    /// Get a category by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, slug, description, created_at FROM shop.category WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Category::from))
    }

    /// Insert a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name or slug is taken.
    /// Returns `RepositoryError::Database` for other failures.
    pub async fn create(&self, input: &CategoryInput) -> Result<Category, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r"
            INSERT INTO shop.category (name, slug, description)
            VALUES ($1, $2, $3)
            RETURNING id, name, slug, description, created_at
            ",
        )
        .bind(&input.name)
        .bind(input.slug.as_str())
        .bind(&input.description)
        .fetch_one(self.pool)
        .await
        .map_err(map_unique)?;

        Ok(row.into())
    }

    /// Update a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category does not exist.
    /// Returns `RepositoryError::Conflict` if the name or slug is taken.
    /// Returns `RepositoryError::Database` for other failures.
    pub async fn update(
        &self,
        id: CategoryId,
        input: &CategoryInput,
    ) -> Result<Category, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r"
            UPDATE shop.category
            SET name = $2, slug = $3, description = $4
            WHERE id = $1
            RETURNING id, name, slug, description, created_at
            ",
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.slug.as_str())
        .bind(&input.description)
        .fetch_optional(self.pool)
        .await
        .map_err(map_unique)?;

        row.map(Category::from).ok_or(RepositoryError::NotFound)
    }

    /// Delete a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category does not exist.
    /// Returns `RepositoryError::Conflict` if sarees still reference it.
    /// Returns `RepositoryError::Database` for other failures.
    pub async fn delete(&self, id: CategoryId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.category WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_foreign_key_violation()
                {
                    return RepositoryError::Conflict("category still has sarees".to_owned());
                }
                RepositoryError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

fn map_unique(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict("category name already exists".to_owned());
    }
    RepositoryError::Database(e)
}
