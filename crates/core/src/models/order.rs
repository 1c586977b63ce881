use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{OrderId, Price, SareeId};

/// A paid order captured through the payment gateway.
///
/// The saree name and price are a snapshot taken at payment time, so the
/// order keeps them after the saree itself is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub saree_id: Option<SareeId>,
    pub saree_name: String,
    pub price: Decimal,
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub order_date: DateTime<Utc>,
}

impl Order {
    /// Paid amount as a rupee [`Price`].
    #[must_use]
    pub const fn price(&self) -> Price {
        Price::inr(self.price)
    }
}
