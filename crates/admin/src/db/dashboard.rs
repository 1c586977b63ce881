//! Aggregates for the dashboard.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;

use silk_saree_core::Order;

use super::RepositoryError;
use super::orders::{ORDER_COLUMNS, OrderRow};

/// Headline numbers shown on the dashboard.
#[derive(Debug, Clone, Default)]
pub struct DashboardStats {
    pub total_sarees: i64,
    pub total_orders: i64,
    /// Sum of all order prices, zero when there are none.
    pub total_revenue: Decimal,
    pub new_enquiries: i64,
}

/// Revenue collected on one calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct DailyRevenue {
    pub day: NaiveDate,
    pub revenue: Decimal,
}

#[derive(Debug, sqlx::FromRow)]
struct StatsRow {
    total_sarees: i64,
    total_orders: i64,
    total_revenue: Decimal,
    new_enquiries: i64,
}

/// Repository for dashboard reads.
pub struct DashboardRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DashboardRepository<'a> {
    /// Create a new dashboard repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Catalog and sales totals.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn stats(&self) -> Result<DashboardStats, RepositoryError> {
        let row = sqlx::query_as::<_, StatsRow>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM shop.saree) AS total_sarees,
                (SELECT COUNT(*) FROM shop."order") AS total_orders,
                (SELECT COALESCE(SUM(price), 0) FROM shop."order") AS total_revenue,
                (SELECT COUNT(*) FROM shop.enquiry WHERE status = 'new') AS new_enquiries
            "#,
        )
        .fetch_one(self.pool)
        .await?;

        Ok(DashboardStats {
            total_sarees: row.total_sarees,
            total_orders: row.total_orders,
            total_revenue: row.total_revenue,
            new_enquiries: row.new_enquiries,
        })
    }

    /// The most recent orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn recent_orders(&self, limit: i64) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            r#"SELECT {ORDER_COLUMNS} FROM shop."order" ORDER BY order_date DESC, id DESC LIMIT $1"#
        ))
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    /// Revenue per day for the last `days` days, including empty days.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn daily_revenue(&self, days: i32) -> Result<Vec<DailyRevenue>, RepositoryError> {
        let rows = sqlx::query_as::<_, DailyRevenue>(
            r#"
            SELECT d.day::date AS day,
                   COALESCE(SUM(o.price), 0) AS revenue
            FROM generate_series(
                     (NOW() AT TIME ZONE 'UTC')::date - ($1 - 1),
                     (NOW() AT TIME ZONE 'UTC')::date,
                     INTERVAL '1 day'
                 ) AS d(day)
            LEFT JOIN shop."order" o
                   ON (o.order_date AT TIME ZONE 'UTC')::date = d.day::date
            GROUP BY d.day
            ORDER BY d.day
            "#,
        )
        .bind(days)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Every order price, for the price distribution chart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn order_prices(&self) -> Result<Vec<Decimal>, RepositoryError> {
        let prices = sqlx::query_scalar::<_, Decimal>(r#"SELECT price FROM shop."order""#)
            .fetch_all(self.pool)
            .await?;
        Ok(prices)
    }
}
