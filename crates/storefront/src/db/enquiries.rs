//! Customer enquiries.

use sqlx::PgPool;

use silk_saree_core::{EnquiryId, SareeId};

use super::RepositoryError;

/// A validated enquiry ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEnquiry {
    pub saree_id: SareeId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: String,
}

/// Repository for enquiry inserts.
pub struct EnquiryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> EnquiryRepository<'a> {
    /// Create a new enquiry repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new enquiry with status `new`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the saree no longer exists,
    /// `RepositoryError::Database` for other failures.
    pub async fn create(&self, enquiry: &NewEnquiry) -> Result<EnquiryId, RepositoryError> {
        sqlx::query_scalar::<_, EnquiryId>(
            r"
            INSERT INTO shop.enquiry (saree_id, name, email, phone, message)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            ",
        )
        .bind(enquiry.saree_id)
        .bind(&enquiry.name)
        .bind(enquiry.email.as_deref())
        .bind(enquiry.phone.as_deref())
        .bind(&enquiry.message)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::NotFound;
            }
            RepositoryError::Database(e)
        })
    }
}
