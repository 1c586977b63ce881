//! Business logic services for storefront.
//!
//! # Services
//!
//! - [`razorpay`] - Payment gateway orders and signature verification
//! - [`settings_cache`] - Short-lived cache of the site settings row

pub mod razorpay;
pub mod settings_cache;

pub use razorpay::{GatewayOrder, RazorpayClient, RazorpayError};
pub use settings_cache::SettingsCache;
