//! Order listing.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Router, extract::State, routing::get};
use tower_sessions::Session;
use tracing::instrument;

use silk_saree_core::{Order, OrderId, SareeId};

use super::Shell;
use crate::db::OrderRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Order display data.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: OrderId,
    /// `None` once the saree has been deleted.
    pub saree_id: Option<SareeId>,
    pub saree_name: String,
    pub price: String,
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub order_date: String,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            saree_id: order.saree_id,
            saree_name: order.saree_name.clone(),
            price: order.price().display(),
            razorpay_order_id: order.razorpay_order_id.clone(),
            razorpay_payment_id: order.razorpay_payment_id.clone(),
            order_date: order.order_date.format("%Y-%m-%d %H:%M UTC").to_string(),
        }
    }
}

/// Orders page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders.html")]
pub struct OrdersTemplate {
    pub shell: Shell,
    pub orders: Vec<OrderView>,
}

/// Build the orders router.
pub fn router() -> Router<AppState> {
    Router::new().route("/orders", get(list))
}

/// List all orders, newest first.
///
/// GET /orders
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn list(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<OrdersTemplate> {
    let orders = OrderRepository::new(state.pool()).list().await?;

    Ok(OrdersTemplate {
        shell: Shell::load(admin, &session).await,
        orders: orders.iter().map(OrderView::from).collect(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn test_order_view_formats_snapshot() {
        let order = Order {
            id: OrderId::new(3),
            saree_id: None,
            saree_name: "Banarasi Emerald Weave".to_owned(),
            price: "7499".parse().unwrap(),
            razorpay_order_id: "order_Nx1".to_owned(),
            razorpay_payment_id: "pay_Nx1".to_owned(),
            order_date: Utc.with_ymd_and_hms(2024, 5, 2, 14, 30, 0).unwrap(),
        };

        let view = OrderView::from(&order);
        assert_eq!(view.price, "₹7,499.00");
        assert_eq!(view.order_date, "2024-05-02 14:30 UTC");
        assert!(view.saree_id.is_none());
    }
}
