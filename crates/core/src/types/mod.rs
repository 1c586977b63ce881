//! Core types for the Silk Saree catalog.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod flash;
pub mod id;
pub mod price;
pub mod slug;
pub mod status;
pub mod username;

pub use email::{Email, EmailError};
pub use flash::{FlashLevel, FlashMessage};
pub use id::*;
pub use price::{CurrencyCode, Price, PriceError};
pub use slug::{Slug, SlugError};
pub use status::*;
pub use username::{Username, UsernameError};
