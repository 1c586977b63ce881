//! Business logic services for admin.
//!
//! # Services
//!
//! - `auth` - Username/password authentication (Argon2id)
//! - `uploads` - Saree image storage in the shared upload directory

pub mod auth;
pub mod uploads;

pub use auth::{AuthError, AuthService};
pub use uploads::{UploadError, UploadStore};
