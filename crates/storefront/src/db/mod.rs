//! Database operations for the storefront.
//!
//! # Schema
//!
//! The storefront reads the shared catalog and writes customer activity:
//!
//! - `shop.category`, `shop.saree` - read only
//! - `shop.site_settings` - read only (cached, see [`crate::services::SettingsCache`])
//! - `shop.enquiry` - inserted from the saree details page
//! - `shop.checkout` - one row per gateway order created
//! - `shop.order` - one row per verified payment
//! - `storefront.session` - tower-sessions storage
//!
//! # Migrations
//!
//! Migrations live in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p silk-saree-cli -- migrate
//! ```

pub mod catalog;
pub mod checkout;
pub mod enquiries;
pub mod settings;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use catalog::CatalogRepository;
pub use checkout::{CheckoutRepository, NewCheckout, RecordOutcome};
pub use enquiries::{EnquiryRepository, NewEnquiry};
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

    /// Constraint violation (e.g., duplicate payment id).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
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
