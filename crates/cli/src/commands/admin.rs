//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! ADMIN_PASSWORD='long passphrase' saree-cli admin create -u priya
//! ADMIN_PASSWORD='new passphrase' saree-cli admin set-password -u priya
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string
//! - `ADMIN_PASSWORD` - Password to set; kept out of argv and shell history

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use silk_saree_admin::services::{AuthError, AuthService};

use super::{ConnectError, connect};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// `ADMIN_PASSWORD` is not set.
    #[error("Missing environment variable: ADMIN_PASSWORD")]
    MissingPassword,

    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

fn password_from_env() -> Result<SecretString, AdminError> {
    std::env::var("ADMIN_PASSWORD")
        .ok()
        .filter(|p| !p.is_empty())
        .map(SecretString::from)
        .ok_or(AdminError::MissingPassword)
}

/// Create a new admin user.
///
/// # Returns
///
/// The ID of the created admin user.
pub async fn create_user(username: &str) -> Result<i32, AdminError> {
    let pool = connect().await?;
    let password = password_from_env()?;

    tracing::info!("Creating admin user: {}", username.trim());
    let admin = AuthService::new(&pool)
        .create_admin(username, password.expose_secret())
        .await?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Username: {}",
        admin.id,
        admin.username
    );
    Ok(admin.id.as_i32())
}

/// Replace an existing admin user's password.
pub async fn set_password(username: &str) -> Result<(), AdminError> {
    let pool = connect().await?;
    let password = password_from_env()?;

    AuthService::new(&pool)
        .set_password(username, password.expose_secret())
        .await?;

    tracing::info!("Password updated for {}", username.trim());
    Ok(())
}
