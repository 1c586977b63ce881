//! Order listing.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use silk_saree_core::{Order, OrderId, SareeId};

use super::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
pub(super) struct OrderRow {
    id: OrderId,
    saree_id: Option<SareeId>,
    saree_name: String,
    price: Decimal,
    razorpay_order_id: String,
    razorpay_payment_id: String,
    order_date: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.id,
            saree_id: row.saree_id,
            saree_name: row.saree_name,
            price: row.price,
            razorpay_order_id: row.razorpay_order_id,
            razorpay_payment_id: row.razorpay_payment_id,
            order_date: row.order_date,
        }
    }
}

pub(super) const ORDER_COLUMNS: &str =
    "id, saree_id, saree_name, price, razorpay_order_id, razorpay_payment_id, order_date";

/// Repository for order reads.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            r#"SELECT {ORDER_COLUMNS} FROM shop."order" ORDER BY order_date DESC, id DESC"#
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }
}
