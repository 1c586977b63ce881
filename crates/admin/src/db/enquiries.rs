//! Enquiry triage.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use silk_saree_core::{Enquiry, EnquiryId, EnquiryStatus, SareeId};

use super::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
struct EnquiryRow {
    id: EnquiryId,
    saree_id: Option<SareeId>,
    saree_name: Option<String>,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    message: String,
    status: EnquiryStatus,
    created_at: DateTime<Utc>,
}

impl From<EnquiryRow> for Enquiry {
    fn from(row: EnquiryRow) -> Self {
        Self {
            id: row.id,
            saree_id: row.saree_id,
            saree_name: row.saree_name,
            name: row.name,
            email: row.email,
            phone: row.phone,
            message: row.message,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

/// Repository for enquiry reads and status changes.
pub struct EnquiryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> EnquiryRepository<'a> {
    /// Create a new enquiry repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All enquiries, newest first, with the saree name when it still exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Enquiry>, RepositoryError> {
        let rows = sqlx::query_as::<_, EnquiryRow>(
            r"
            SELECT e.id, e.saree_id, s.name AS saree_name, e.name, e.email,
                   e.phone, e.message, e.status, e.created_at
            FROM shop.enquiry e
            LEFT JOIN shop.saree s ON s.id = e.saree_id
            ORDER BY e.created_at DESC, e.id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Enquiry::from).collect())
    }

    /// Move an enquiry to a new status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the enquiry does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update_status(
        &self,
        id: EnquiryId,
        status: EnquiryStatus,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE shop.enquiry SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete an enquiry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the enquiry does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: EnquiryId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.enquiry WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
