//! Domain models for admin.
//!
//! Catalog models are shared through `silk_saree_core`; only the admin
//! identity types live here.

pub mod admin_user;
pub mod session;

pub use admin_user::AdminUser;
pub use session::{CurrentAdmin, keys as session_keys};
