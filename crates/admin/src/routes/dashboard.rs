//! Dashboard: headline totals, recent orders and sales charts.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Router, extract::State, routing::get};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tower_sessions::Session;
use tracing::instrument;

use silk_saree_core::Price;
use silk_saree_core::charts::{ChartError, Color, Figure, Histogram};

use super::Shell;
use super::orders::OrderView;
use crate::db::{DailyRevenue, DashboardRepository};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Days covered by the revenue chart.
const REVENUE_DAYS: i32 = 30;

/// Orders listed under "Recent orders".
const RECENT_ORDERS: i64 = 5;

/// Bins in the order price histogram.
const PRICE_BINS: usize = 8;

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub shell: Shell,
    pub total_sarees: i64,
    pub total_orders: i64,
    pub total_revenue: String,
    pub new_enquiries: i64,
    pub recent_orders: Vec<OrderView>,
    /// Inline SVG, rendered by us.
    pub revenue_chart: String,
    /// Inline SVG; `None` until there are orders.
    pub price_chart: Option<String>,
}

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(dashboard))
}

/// Show the dashboard.
///
/// GET /
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn dashboard(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<DashboardTemplate> {
    let repo = DashboardRepository::new(state.pool());
    let stats = repo.stats().await?;
    let recent_orders = repo.recent_orders(RECENT_ORDERS).await?;
    let daily = repo.daily_revenue(REVENUE_DAYS).await?;
    let prices = repo.order_prices().await?;

    let revenue_chart = revenue_chart(&daily)
        .map_err(|e| AppError::Internal(format!("revenue chart: {e}")))?;
    let price_chart = price_chart(&prices);

    Ok(DashboardTemplate {
        shell: Shell::load(admin, &session).await,
        total_sarees: stats.total_sarees,
        total_orders: stats.total_orders,
        total_revenue: Price::inr(stats.total_revenue).display(),
        new_enquiries: stats.new_enquiries,
        recent_orders: recent_orders.iter().map(OrderView::from).collect(),
        revenue_chart,
        price_chart,
    })
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

/// Line chart of revenue per day, labelled with day-of-month ticks.
#[allow(clippy::cast_precision_loss)]
fn revenue_chart(daily: &[DailyRevenue]) -> std::result::Result<String, ChartError> {
    let x: Vec<f64> = (0..daily.len()).map(|i| i as f64).collect();
    let y: Vec<f64> = daily.iter().map(|d| to_f64(d.revenue)).collect();

    let mut figure = Figure::new(1, 1).with_size(720.0, 300.0);
    let axes = figure.subplot(1, 1, 1)?;
    axes.set_title(format!("Revenue, last {REVENUE_DAYS} days"))
        .set_ylabel("Rupees");
    // Label every fifth day so ticks stay readable.
    axes.set_xticks_labeled(
        daily
            .iter()
            .enumerate()
            .step_by(5)
            .map(|(i, d)| (i as f64, d.day.format("%d %b").to_string())),
    );
    axes.plot(&x, &y)?.color(Color::MAROON);

    Ok(figure.to_svg())
}

/// Histogram of order prices, or `None` when there are no orders.
fn price_chart(prices: &[Decimal]) -> Option<String> {
    let values: Vec<f64> = prices.iter().copied().map(to_f64).collect();
    let histogram = Histogram::uniform(&values, PRICE_BINS).ok()?;

    let mut figure = Figure::new(1, 1).with_size(720.0, 300.0);
    let axes = figure.subplot(1, 1, 1).ok()?;
    axes.set_title("Order prices")
        .set_xlabel("Rupees")
        .set_ylabel("Orders");
    axes.hist(&histogram).color(Color::GOLD);

    Some(figure.to_svg())
}
