use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, Price, SareeId, Slug};

/// A category grouping sarees on the storefront (e.g. "Kanchipuram").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: Slug,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// A saree listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Saree {
    pub id: SareeId,
    pub category_id: Option<CategoryId>,
    pub name: String,
    /// Price in rupees.
    pub price: Decimal,
    pub description: String,
    /// File name inside the upload directory.
    pub image_filename: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Saree {
    /// Catalog price as a rupee [`Price`].
    #[must_use]
    pub const fn price(&self) -> Price {
        Price::inr(self.price)
    }

    /// Public URL path of the saree image.
    #[must_use]
    pub fn image_url(&self) -> String {
        format!("/uploads/{}", self.image_filename)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_saree_helpers() {
        let now = Utc::now();
        let saree = Saree {
            id: SareeId::new(1),
            category_id: None,
            name: "Kanchipuram Royal Maroon".to_owned(),
            price: "8999".parse().unwrap(),
            description: "Pure silk".to_owned(),
            image_filename: "20240101120000000000_maroon.svg".to_owned(),
            created_at: now,
            updated_at: now,
        };

        assert_eq!(saree.price().display(), "₹8,999.00");
        assert_eq!(
            saree.image_url(),
            "/uploads/20240101120000000000_maroon.svg"
        );
    }
}
