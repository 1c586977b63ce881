//! Gateway checkouts and the orders they turn into.
//!
//! A checkout row is written when a gateway order is created for a saree.
//! When the browser reports a successful payment, the order is recorded
//! from that row, never from client-supplied name or price.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use silk_saree_core::{OrderId, SareeId};

use super::RepositoryError;

/// Data for a new checkout row.
#[derive(Debug, Clone)]
pub struct NewCheckout<'a> {
    pub razorpay_order_id: &'a str,
    pub saree_id: SareeId,
    pub saree_name: &'a str,
    pub price: Decimal,
    pub amount_minor: i64,
    pub currency: &'a str,
}

/// A stored checkout.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Checkout {
    pub razorpay_order_id: String,
    pub saree_id: Option<SareeId>,
    pub saree_name: String,
    pub price: Decimal,
    pub amount_minor: i64,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

/// Result of recording a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// A new order row was written.
    Created(OrderId),
    /// The payment id was already recorded.
    AlreadyRecorded,
}

/// Repository for checkouts and order capture.
pub struct CheckoutRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CheckoutRepository<'a> {
    /// Create a new checkout repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a checkout for a newly created gateway order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the gateway order id is
    /// already stored, `RepositoryError::Database` for other failures.
    pub async fn create(&self, checkout: &NewCheckout<'_>) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO shop.checkout
                (razorpay_order_id, saree_id, saree_name, price, amount_minor, currency)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(checkout.razorpay_order_id)
        .bind(checkout.saree_id)
        .bind(checkout.saree_name)
        .bind(checkout.price)
        .bind(checkout.amount_minor)
        .bind(checkout.currency)
        .execute(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("checkout already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(())
    }

    /// Look up the checkout for a gateway order id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, razorpay_order_id: &str) -> Result<Option<Checkout>, RepositoryError> {
        let row = sqlx::query_as::<_, Checkout>(
            r"
            SELECT razorpay_order_id, saree_id, saree_name, price, amount_minor,
                   currency, created_at
            FROM shop.checkout
            WHERE razorpay_order_id = $1
            ",
        )
        .bind(razorpay_order_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Record a verified payment as an order.
    ///
    /// Idempotent on the payment id: a second call for the same payment
    /// returns [`RecordOutcome::AlreadyRecorded`] and writes nothing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn record_order(
        &self,
        checkout: &Checkout,
        razorpay_payment_id: &str,
    ) -> Result<RecordOutcome, RepositoryError> {
        let id = sqlx::query_scalar::<_, OrderId>(
            r#"
            INSERT INTO shop."order"
                (saree_id, saree_name, price, razorpay_order_id, razorpay_payment_id)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (razorpay_payment_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(checkout.saree_id)
        .bind(&checkout.saree_name)
        .bind(checkout.price)
        .bind(&checkout.razorpay_order_id)
        .bind(razorpay_payment_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(id.map_or(RecordOutcome::AlreadyRecorded, RecordOutcome::Created))
    }
}
