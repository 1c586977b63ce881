//! Silk Saree Core - Shared types library.
//!
//! This crate provides common types used across all Silk Saree components:
//! - `storefront` - Public catalog, enquiries and checkout
//! - `admin` - Catalog management panel
//! - `cli` - Migrations, admin users, seeding and chart rendering
//!
//! # Architecture
//!
//! The core crate contains only types, models and pure rendering - no I/O,
//! no database access, no HTTP clients. This keeps it lightweight and allows
//! it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, slugs and statuses
//! - [`models`] - Catalog records shared by the storefront and admin
//! - [`charts`] - Figure model rendered to SVG

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod charts;
pub mod models;
pub mod types;

pub use models::*;
pub use types::*;
