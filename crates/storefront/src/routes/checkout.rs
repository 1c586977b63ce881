//! Razorpay checkout endpoints (JSON).
//!
//! The browser asks for a gateway order, opens Razorpay Checkout with it and
//! reports the signed result to `/payment/success`. The order that gets
//! recorded always comes from the server-side checkout row.

use std::collections::BTreeMap;

use axum::{
    Form, Json,
    extract::{FromRequest, Path, Request, State},
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use silk_saree_core::{Saree, SareeId};

use crate::db::{CatalogRepository, CheckoutRepository, NewCheckout, RecordOutcome};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::services::razorpay::CreateOrder;
use crate::state::AppState;

/// Response for a created gateway order.
#[derive(Debug, Serialize)]
pub struct OrderCreated {
    pub order_id: String,
    /// Amount in paise.
    pub amount: i64,
    pub currency: String,
    pub name: String,
    pub price: Decimal,
    pub key: String,
}

/// Gateway order for `saree`: the price in paise, captured automatically.
fn order_request(saree: &Saree) -> Result<CreateOrder<'static>> {
    let price = saree.price();
    let amount = price
        .minor_units()
        .ok_or_else(|| AppError::Internal(format!("price of saree {} overflows", saree.id)))?;

    Ok(CreateOrder {
        amount,
        currency: price.currency_code.code(),
        payment_capture: 1,
        notes: BTreeMap::from([
            ("saree_id", saree.id.to_string()),
            ("saree_name", saree.name.clone()),
        ]),
    })
}

/// Create a Razorpay order for a saree.
///
/// Failures are answered as `{"error": ...}` for the checkout script.
#[instrument(skip(state))]
pub async fn create_order(State(state): State<AppState>, Path(saree_id): Path<i32>) -> Response {
    start_checkout(&state, SareeId::new(saree_id))
        .await
        .unwrap_or_else(|e| e.into_json_response(|message| json!({"error": message})))
}

async fn start_checkout(state: &AppState, saree_id: SareeId) -> Result<Response> {
    let saree = CatalogRepository::new(state.pool())
        .get_saree(saree_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("saree {saree_id}")))?;

    let Some(client) = state.razorpay() else {
        return Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Razorpay keys are not configured on server."})),
        )
            .into_response());
    };

    let request = order_request(&saree)?;
    let gateway_order = client.create_order(&request).await?;

    CheckoutRepository::new(state.pool())
        .create(&NewCheckout {
            razorpay_order_id: &gateway_order.id,
            saree_id: saree.id,
            saree_name: &saree.name,
            price: saree.price,
            amount_minor: request.amount,
            currency: request.currency,
        })
        .await?;

    add_breadcrumb(
        "checkout",
        "Gateway order created",
        &[("saree_id", &saree.id.to_string()), ("order_id", &gateway_order.id)],
    );

    Ok(Json(OrderCreated {
        order_id: gateway_order.id,
        amount: request.amount,
        currency: request.currency.to_owned(),
        name: saree.name,
        price: saree.price,
        key: client.key_id().to_owned(),
    })
    .into_response())
}

/// Fields posted by the checkout widget handler.
///
/// `saree_name` and `price` are sent by older pages; they are only compared
/// against the stored checkout, never recorded.
#[derive(Debug, Default, Deserialize)]
pub struct PaymentFields {
    #[serde(default)]
    pub razorpay_order_id: Option<String>,
    #[serde(default)]
    pub razorpay_payment_id: Option<String>,
    #[serde(default)]
    pub razorpay_signature: Option<String>,
    #[serde(default)]
    pub saree_name: Option<String>,
    #[serde(default)]
    pub price: Option<serde_json::Value>,
}

/// Payment report body, accepted as JSON or as a urlencoded form.
///
/// An unreadable body yields empty fields so the handler can answer with its
/// own JSON error.
#[derive(Debug, Default)]
pub struct PaymentPayload(pub PaymentFields);

impl<S> FromRequest<S> for PaymentPayload
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        let fields = if is_json {
            Json::<PaymentFields>::from_request(req, state)
                .await
                .map(|Json(fields)| fields)
                .unwrap_or_default()
        } else {
            Form::<PaymentFields>::from_request(req, state)
                .await
                .map(|Form(fields)| fields)
                .unwrap_or_default()
        };

        Ok(Self(fields))
    }
}

/// The three signed values of a completed payment.
struct SignedPayment<'a> {
    order_id: &'a str,
    payment_id: &'a str,
    signature: &'a str,
}

/// A trimmed, non-empty field value.
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

impl PaymentFields {
    fn signed(&self) -> Option<SignedPayment<'_>> {
        Some(SignedPayment {
            order_id: present(self.razorpay_order_id.as_deref())?,
            payment_id: present(self.razorpay_payment_id.as_deref())?,
            signature: present(self.razorpay_signature.as_deref())?,
        })
    }

    /// Legacy price field as a decimal, whether sent as a string or number.
    fn legacy_price(&self) -> Option<Decimal> {
        match self.price.as_ref()? {
            serde_json::Value::String(s) => s.trim().parse().ok(),
            serde_json::Value::Number(n) => n.to_string().parse().ok(),
            _ => None,
        }
    }
}

fn payment_status(status: StatusCode, outcome: &str, message: &str) -> Response {
    (status, Json(json!({"status": outcome, "message": message}))).into_response()
}

/// Verify a completed payment and record the order.
///
/// Every outcome, including server failures, is a `{status, message}` body.
#[instrument(skip(state, fields))]
pub async fn payment_success(
    State(state): State<AppState>,
    PaymentPayload(fields): PaymentPayload,
) -> Response {
    record_payment(&state, &fields).await.unwrap_or_else(|e| {
        e.into_json_response(|message| json!({"status": "error", "message": message}))
    })
}

async fn record_payment(state: &AppState, fields: &PaymentFields) -> Result<Response> {
    let Some(payment) = fields.signed() else {
        return Ok(payment_status(
            StatusCode::BAD_REQUEST,
            "error",
            "Invalid payment data.",
        ));
    };

    let Some(client) = state.razorpay() else {
        return Ok(payment_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            "error",
            "Razorpay is not configured.",
        ));
    };

    if !client.verify_payment_signature(payment.order_id, payment.payment_id, payment.signature) {
        tracing::warn!(order_id = %payment.order_id, "Payment signature verification failed");
        return Ok(payment_status(
            StatusCode::BAD_REQUEST,
            "error",
            "Payment signature verification failed.",
        ));
    }

    let repo = CheckoutRepository::new(state.pool());
    let Some(checkout) = repo.get(payment.order_id).await? else {
        tracing::warn!(order_id = %payment.order_id, "Signed payment for unknown order");
        return Ok(payment_status(
            StatusCode::BAD_REQUEST,
            "error",
            "Unknown order.",
        ));
    };

    let name_mismatch = fields
        .saree_name
        .as_deref()
        .is_some_and(|name| name.trim() != checkout.saree_name);
    let price_mismatch = fields
        .legacy_price()
        .is_some_and(|price| price != checkout.price);
    if name_mismatch || price_mismatch {
        tracing::warn!(
            order_id = %checkout.razorpay_order_id,
            "Client-supplied saree details differ from checkout; using stored values"
        );
    }

    match repo.record_order(&checkout, payment.payment_id).await? {
        RecordOutcome::AlreadyRecorded => Ok(payment_status(
            StatusCode::OK,
            "ok",
            "Payment already recorded.",
        )),
        RecordOutcome::Created(order_id) => {
            add_breadcrumb(
                "checkout",
                "Order placed",
                &[("order_id", &checkout.razorpay_order_id)],
            );
            tracing::info!(
                order_id = %order_id,
                razorpay_order_id = %checkout.razorpay_order_id,
                currency = %checkout.currency,
                "Payment verified and order recorded"
            );
            Ok(payment_status(
                StatusCode::OK,
                "ok",
                "Payment verified and order placed.",
            ))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn saree(price: &str) -> Saree {
        Saree {
            id: SareeId::new(7),
            category_id: None,
            name: "Banarasi Emerald Weave".to_owned(),
            price: price.parse().unwrap(),
            description: "Zari buttis on emerald silk".to_owned(),
            image_filename: "emerald.png".to_owned(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_order_request_uses_paise() {
        let request = order_request(&saree("7499.50")).unwrap();
        assert_eq!(request.amount, 749_950);
        assert_eq!(request.currency, "INR");
        assert_eq!(request.payment_capture, 1);
        assert_eq!(request.notes.get("saree_id").map(String::as_str), Some("7"));
        assert_eq!(
            request.notes.get("saree_name").map(String::as_str),
            Some("Banarasi Emerald Weave")
        );
    }

    #[test]
    fn test_signed_requires_all_three_fields() {
        let mut fields = PaymentFields {
            razorpay_order_id: Some("order_1".to_owned()),
            razorpay_payment_id: Some("pay_1".to_owned()),
            razorpay_signature: Some("  ".to_owned()),
            ..PaymentFields::default()
        };
        assert!(fields.signed().is_none());

        fields.razorpay_signature = Some("abc".to_owned());
        assert!(fields.signed().is_some_and(|p| p.signature == "abc"));
    }

    #[test]
    fn test_legacy_price_accepts_string_or_number() {
        let from_string = PaymentFields {
            price: Some(json!("8999.00")),
            ..PaymentFields::default()
        };
        let from_number = PaymentFields {
            price: Some(json!(8999)),
            ..PaymentFields::default()
        };
        let expected: Option<Decimal> = "8999".parse().ok();
        assert_eq!(from_string.legacy_price(), expected);
        assert_eq!(from_number.legacy_price(), expected);
    }
}
