//! Admin user repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use silk_saree_core::{AdminUserId, Username};

use super::RepositoryError;
use crate::models::AdminUser;

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` admin user queries.
#[derive(Debug, sqlx::FromRow)]
struct AdminUserRow {
    id: AdminUserId,
    username: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    last_login_at: Option<DateTime<Utc>>,
}

impl TryFrom<AdminUserRow> for AdminLogin {
    type Error = RepositoryError;

    fn try_from(row: AdminUserRow) -> Result<Self, Self::Error> {
        let username = Username::parse(&row.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;

        Ok(Self {
            user: AdminUser {
                id: row.id,
                username,
                created_at: row.created_at,
                last_login_at: row.last_login_at,
            },
            password_hash: row.password_hash,
        })
    }
}

/// An admin user together with the stored password hash, for login checks.
#[derive(Debug, Clone)]
pub struct AdminLogin {
    pub user: AdminUser,
    /// Argon2 PHC string.
    pub password_hash: String,
}

const ADMIN_COLUMNS: &str = "id, username, password_hash, created_at, last_login_at";

// =============================================================================
// Repository
// =============================================================================

/// Repository for admin user database operations.
pub struct AdminUserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminUserRepository<'a> {
    /// Create a new admin user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look up an admin and their password hash by username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_login(&self, username: &str) -> Result<Option<AdminLogin>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminUserRow>(&format!(
            "SELECT {ADMIN_COLUMNS} FROM admin.admin_user WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Create a new admin user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<AdminUser, RepositoryError> {
        let row = sqlx::query_as::<_, AdminUserRow>(&format!(
            r"
            INSERT INTO admin.admin_user (username, password_hash)
            VALUES ($1, $2)
            RETURNING {ADMIN_COLUMNS}
            "
        ))
        .bind(username.as_str())
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("username already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        let login: AdminLogin = row.try_into()?;
        Ok(login.user)
    }

    /// Replace an admin's password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no admin has that username.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set_password_hash(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE admin.admin_user
            SET password_hash = $2
            WHERE username = $1
            ",
        )
        .bind(username.as_str())
        .bind(password_hash)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Stamp a successful login.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn record_login(&self, id: AdminUserId) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE admin.admin_user SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}
