//! Catalog records shared by the storefront and admin binaries.
//!
//! These are plain domain structs. Each binary maps its own database rows
//! into them, so this module stays free of I/O.

mod catalog;
mod enquiry;
mod order;
mod settings;

pub use catalog::{Category, Saree};
pub use enquiry::Enquiry;
pub use order::Order;
pub use settings::SiteSettings;
