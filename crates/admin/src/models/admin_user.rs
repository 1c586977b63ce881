//! Admin user domain types.

use chrono::{DateTime, Utc};

use silk_saree_core::{AdminUserId, Username};

use super::CurrentAdmin;

/// An admin user (domain type).
///
/// The password hash never leaves the repository and auth service; it is
/// not part of this type.
#[derive(Debug, Clone)]
pub struct AdminUser {
    /// Unique admin user ID.
    pub id: AdminUserId,
    /// Login name.
    pub username: Username,
    /// When the admin was created.
    pub created_at: DateTime<Utc>,
    /// Last successful login.
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<&AdminUser> for CurrentAdmin {
    fn from(user: &AdminUser) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}
