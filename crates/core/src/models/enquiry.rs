use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{EnquiryId, EnquiryStatus, SareeId};

/// A customer question about a saree, left through the details page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enquiry {
    pub id: EnquiryId,
    pub saree_id: Option<SareeId>,
    /// Saree name at the time of listing, when the saree still exists.
    pub saree_name: Option<String>,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: String,
    pub status: EnquiryStatus,
    pub created_at: DateTime<Utc>,
}

impl Enquiry {
    /// Best available way to reach the customer.
    #[must_use]
    pub fn contact(&self) -> &str {
        self.email
            .as_deref()
            .or(self.phone.as_deref())
            .unwrap_or_default()
    }
}
