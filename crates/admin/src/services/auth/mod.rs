//! Admin authentication service.
//!
//! Username and password login with Argon2id hashes.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use silk_saree_core::Username;

use crate::db::RepositoryError;
use crate::db::admin_users::AdminUserRepository;
use crate::models::AdminUser;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Admin authentication service.
pub struct AuthService<'a> {
    users: AdminUserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new admin authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: AdminUserRepository::new(pool),
        }
    }

    /// Check a username and password and stamp the login.
    ///
    /// Unknown usernames and wrong passwords fail the same way.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the login is rejected.
    /// Returns `AuthError::Repository` if the database fails.
    pub async fn login(&self, username: &str, password: &str) -> Result<AdminUser, AuthError> {
        let Some(login) = self.users.get_login(username.trim()).await? else {
            return Err(AuthError::InvalidCredentials);
        };

        verify_password(password, &login.password_hash)?;
        self.users.record_login(login.user.id).await?;

        Ok(login.user)
    }

    /// Create an admin user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` if the username is malformed.
    /// Returns `AuthError::WeakPassword` if the password is too short.
    /// Returns `AuthError::UserAlreadyExists` if the username is taken.
    pub async fn create_admin(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AdminUser, AuthError> {
        let username = Username::parse(username)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        self.users
            .create(&username, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })
    }

    /// Replace an admin's password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WeakPassword` if the password is too short.
    /// Returns `AuthError::UserNotFound` if no admin has that username.
    pub async fn set_password(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let username = Username::parse(username)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        self.users
            .set_password_hash(&username, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::UserNotFound,
                other => AuthError::Repository(other),
            })
    }
}

fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("kanchipuram-silk").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("kanchipuram-silk", &hash).is_ok());
        assert!(matches!(
            verify_password("banarasi-silk", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_validate_password_length() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("longenough").is_ok());
    }
}
