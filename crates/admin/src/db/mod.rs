//! Database operations for the admin panel.
//!
//! # Schemas
//!
//! - `admin.admin_user` - Admin logins (Argon2 password hashes)
//! - `admin.session` - Admin session storage
//! - `shop.category`, `shop.saree` - Catalog, managed here
//! - `shop."order"`, `shop.enquiry` - Read and triaged here
//! - `shop.site_settings` - Single-row store settings
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p silk-saree-cli -- migrate
//! ```

pub mod admin_users;
pub mod categories;
pub mod dashboard;
pub mod enquiries;
pub mod orders;
pub mod sarees;
pub mod settings;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use admin_users::{AdminLogin, AdminUserRepository};
pub use categories::{CategoryInput, CategoryRepository, CategoryWithCount};
pub use dashboard::{DashboardRepository, DashboardStats, DailyRevenue};
pub use enquiries::EnquiryRepository;
pub use orders::OrderRepository;
pub use sarees::{SareeInput, SareeRepository};
pub use settings::SettingsRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
