//! Status enums for catalog entities.

use serde::{Deserialize, Serialize};

/// Follow-up state of a customer enquiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "shop.enquiry_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum EnquiryStatus {
    /// Not yet handled by the store.
    #[default]
    New,
    /// The customer has been contacted.
    Contacted,
    /// Nothing further to do.
    Closed,
}

impl EnquiryStatus {
    /// All statuses in workflow order.
    pub const ALL: [Self; 3] = [Self::New, Self::Contacted, Self::Closed];

    /// Storage and form value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Closed => "closed",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Contacted => "Contacted",
            Self::Closed => "Closed",
        }
    }
}

impl std::fmt::Display for EnquiryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EnquiryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "contacted" => Ok(Self::Contacted),
            "closed" => Ok(Self::Closed),
            _ => Err(format!("invalid enquiry status: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_enquiry_status_round_trips_through_str() {
        for status in EnquiryStatus::ALL {
            assert_eq!(status.as_str().parse::<EnquiryStatus>().unwrap(), status);
        }
        assert!("pending".parse::<EnquiryStatus>().is_err());
    }
}
