//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                       - Liveness check
//! GET  /health/ready                 - Readiness check (database)
//!
//! # Auth
//! GET  /auth/login                   - Login form
//! POST /auth/login                   - Username/password login (rate limited)
//! POST /auth/logout                  - Logout
//!
//! # Catalog (authenticated)
//! GET  /                             - Dashboard
//! GET  /sarees                       - Manage sarees
//! GET  /sarees/new, POST             - Add saree (multipart)
//! GET  /sarees/{id}/edit, POST       - Edit saree (multipart)
//! POST /sarees/{id}/delete           - Delete saree
//! GET  /categories                   - Manage categories
//! GET  /categories/new, POST         - Add category
//! GET  /categories/{id}/edit, POST   - Edit category
//! POST /categories/{id}/delete       - Delete category
//!
//! # Customers (authenticated)
//! GET  /orders                       - Orders, newest first
//! GET  /enquiries                    - Enquiries, newest first
//! POST /enquiries/{id}/status        - Change enquiry status
//! POST /enquiries/{id}/delete        - Delete enquiry
//!
//! # Store (authenticated)
//! GET  /settings, POST               - Site settings
//! ```

pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod enquiries;
pub mod health;
pub mod orders;
pub mod sarees;
pub mod settings;

use axum::{Router, routing::get};
use tower_sessions::Session;

use silk_saree_core::FlashMessage;

use crate::middleware::flash;
use crate::models::CurrentAdmin;
use crate::state::AppState;

/// Shared data for the admin layout: navigation and flash messages.
pub struct Shell {
    pub admin: CurrentAdmin,
    pub flashes: Vec<FlashMessage>,
}

impl Shell {
    /// Take pending flash messages for the logged-in admin.
    pub async fn load(admin: CurrentAdmin, session: &Session) -> Self {
        let flashes = flash::take(session).await;
        Self { admin, flashes }
    }
}

/// Read an optional text field: trimmed, `None` when blank.
pub(crate) fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Create all routes for the admin panel.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(auth::router())
        .merge(dashboard::router())
        .merge(sarees::router())
        .merge(categories::router())
        .merge(orders::router())
        .merge(enquiries::router())
        .merge(settings::router())
}
