//! Database migration command.
//!
//! Migrations live in `crates/admin/migrations/` and cover every schema
//! (`shop`, `admin`, `storefront`), so one run prepares the database for
//! both binaries.
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string

use thiserror::Error;

use super::{ConnectError, connect};

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Apply all pending migrations.
pub async fn run() -> Result<(), MigrationError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../admin/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
