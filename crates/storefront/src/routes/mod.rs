//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                           - Liveness check
//! GET  /health/ready                     - Readiness check (database)
//!
//! # Catalog
//! GET  /                                 - All sarees, newest first
//! GET  /category/{slug}                  - Sarees in a category
//! GET  /saree/{id}                       - Saree details with enquiry form
//!
//! # Enquiries (rate limited)
//! POST /saree/{id}/enquiry               - Submit an enquiry
//!
//! # Checkout (rate limited, JSON)
//! POST /create-razorpay-order/{saree_id} - Create a gateway order
//! POST /payment/success                  - Verify and record a payment
//! ```

pub mod catalog;
pub mod checkout;
pub mod enquiry;
pub mod health;

use axum::{
    Router,
    routing::{get, post},
};
use tower_sessions::Session;

use silk_saree_core::{Category, FlashMessage, Saree, SareeId, SiteSettings};

use crate::db::CatalogRepository;
use crate::error::Result;
use crate::middleware::{checkout_rate_limiter, enquiry_rate_limiter, flash};
use crate::state::AppState;

/// Shared data for the base layout: header, category nav, flashes, footer.
pub struct Layout {
    pub settings: SiteSettings,
    pub categories: Vec<Category>,
    pub whatsapp_link: Option<String>,
    pub flashes: Vec<FlashMessage>,
}

impl Layout {
    /// Load settings and categories, and take pending flash messages.
    ///
    /// # Errors
    ///
    /// Returns an error if the categories cannot be loaded.
    pub async fn load(state: &AppState, session: &Session) -> Result<Self> {
        let settings = state.site_settings().await;
        let categories = CatalogRepository::new(state.pool()).list_categories().await?;
        let whatsapp_link = settings.whatsapp_link();
        let flashes = flash::take(session).await;

        Ok(Self {
            settings,
            categories,
            whatsapp_link,
            flashes,
        })
    }
}

/// Saree summary for listing grids.
#[derive(Debug, Clone)]
pub struct SareeCard {
    pub id: SareeId,
    pub name: String,
    pub price: String,
    pub image_url: String,
}

impl From<&Saree> for SareeCard {
    fn from(saree: &Saree) -> Self {
        Self {
            id: saree.id,
            name: saree.name.clone(),
            price: saree.price().display(),
            image_url: saree.image_url(),
        }
    }
}

/// Create the enquiry routes router.
pub fn enquiry_routes() -> Router<AppState> {
    Router::new()
        .route("/saree/{id}/enquiry", post(enquiry::create))
        .layer(enquiry_rate_limiter())
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/create-razorpay-order/{saree_id}",
            post(checkout::create_order),
        )
        .route("/payment/success", post(checkout::payment_success))
        .layer(checkout_rate_limiter())
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        // Catalog
        .route("/", get(catalog::home))
        .route("/category/{slug}", get(catalog::category))
        .route("/saree/{id}", get(catalog::saree_details))
        .merge(enquiry_routes())
        .merge(checkout_routes())
}
