//! Razorpay API client.
//!
//! Creates gateway orders for a saree and verifies the payment signature the
//! checkout widget returns to the browser.
//!
//! The signature is `hex(HMAC-SHA256(key_secret, "{order_id}|{payment_id}"))`.

use std::collections::BTreeMap;
use std::time::Duration;

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::RazorpayConfig;

/// Razorpay REST API base URL.
const BASE_URL: &str = "https://api.razorpay.com/v1";

type HmacSha256 = Hmac<Sha256>;

/// Errors that can occur when talking to Razorpay.
#[derive(Debug, Error)]
pub enum RazorpayError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Request body for `POST /orders`.
#[derive(Debug, Serialize)]
pub struct CreateOrder<'a> {
    /// Amount in the smallest currency unit (paise).
    pub amount: i64,
    pub currency: &'a str,
    /// Capture the payment automatically once authorised.
    pub payment_capture: u8,
    pub notes: BTreeMap<&'a str, String>,
}

/// Gateway order returned by `POST /orders`.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

/// Razorpay API client.
#[derive(Clone)]
pub struct RazorpayClient {
    client: reqwest::Client,
    base_url: String,
    key_id: String,
    key_secret: SecretString,
}

impl RazorpayClient {
    /// Create a new Razorpay client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &RazorpayConfig) -> Result<Self, RazorpayError> {
        Self::with_base_url(config, BASE_URL)
    }

    /// Create a client against a different API host.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn with_base_url(config: &RazorpayConfig, base_url: &str) -> Result<Self, RazorpayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.clone(),
        })
    }

    /// Public key id handed to the checkout widget.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Create a gateway order.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or Razorpay rejects it.
    #[instrument(skip(self, order), fields(amount = order.amount))]
    pub async fn create_order(&self, order: &CreateOrder<'_>) -> Result<GatewayOrder, RazorpayError> {
        let response = self
            .client
            .post(format!("{}/orders", self.base_url))
            .basic_auth(&self.key_id, Some(self.key_secret.expose_secret()))
            .json(order)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|e| format!("{}: {}", e.error.code, e.error.description))
                .unwrap_or(body);
            return Err(RazorpayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let order: GatewayOrder = response
            .json()
            .await
            .map_err(|e| RazorpayError::Parse(e.to_string()))?;
        debug!(order_id = %order.id, "Razorpay order created");

        Ok(order)
    }

    /// Verify the signature of a completed payment.
    #[must_use]
    pub fn verify_payment_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> bool {
        verify_payment_signature(
            self.key_secret.expose_secret(),
            order_id,
            payment_id,
            signature,
        )
    }
}

/// Compute the expected payment signature.
///
/// Returns `None` only if the key cannot seed the HMAC.
#[must_use]
pub fn payment_signature(key_secret: &str, order_id: &str, payment_id: &str) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(key_secret.as_bytes()).ok()?;
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    Some(hex::encode(mac.finalize().into_bytes()))
}

/// Check `signature` against the expected HMAC in constant time.
#[must_use]
pub fn verify_payment_signature(
    key_secret: &str,
    order_id: &str,
    payment_id: &str,
    signature: &str,
) -> bool {
    payment_signature(key_secret, order_id, payment_id)
        .is_some_and(|expected| constant_time_compare(&expected, signature.trim()))
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SECRET: &str = "Zq8vN3kLm2Xw9Rt5Yb7Pc1Hd";

    fn sign(order_id: &str, payment_id: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(SECRET.as_bytes()).unwrap();
        mac.update(format!("{order_id}|{payment_id}").as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    fn test_config() -> RazorpayConfig {
        RazorpayConfig {
            key_id: "rzp_test_1DP5mmOlF5G5ag".to_owned(),
            key_secret: SecretString::from(SECRET),
        }
    }

    /// Serve `router` on a free local port and return its base URL.
    async fn spawn_gateway(router: axum::Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/v1")
    }

    #[tokio::test]
    async fn test_create_order_against_gateway() {
        use axum::{Json, http::HeaderMap, routing::post};

        let gateway = axum::Router::new().route(
            "/v1/orders",
            post(|headers: HeaderMap, Json(body): Json<serde_json::Value>| async move {
                let authorized = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .is_some_and(|v| v.starts_with("Basic "));
                assert!(authorized, "missing basic auth");
                Json(serde_json::json!({
                    "id": "order_Ox7Kp2",
                    "amount": body["amount"],
                    "currency": body["currency"],
                    "status": "created",
                }))
            }),
        );
        let base_url = spawn_gateway(gateway).await;
        let client = RazorpayClient::with_base_url(&test_config(), &base_url).unwrap();

        let order = client
            .create_order(&CreateOrder {
                amount: 749_950,
                currency: "INR",
                payment_capture: 1,
                notes: BTreeMap::from([("saree_id", "7".to_owned())]),
            })
            .await
            .unwrap();

        assert_eq!(order.id, "order_Ox7Kp2");
        assert_eq!(order.amount, 749_950);
        assert_eq!(order.currency, "INR");
        assert_eq!(order.status, "created");
    }

    #[tokio::test]
    async fn test_create_order_gateway_rejection() {
        use axum::{Json, http::StatusCode, routing::post};

        let gateway = axum::Router::new().route(
            "/v1/orders",
            post(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(serde_json::json!({
                        "error": {
                            "code": "BAD_REQUEST_ERROR",
                            "description": "Authentication failed",
                        }
                    })),
                )
            }),
        );
        let base_url = spawn_gateway(gateway).await;
        let client = RazorpayClient::with_base_url(&test_config(), &base_url).unwrap();

        let err = client
            .create_order(&CreateOrder {
                amount: 100,
                currency: "INR",
                payment_capture: 1,
                notes: BTreeMap::new(),
            })
            .await
            .err()
            .unwrap();

        match err {
            RazorpayError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "BAD_REQUEST_ERROR: Authentication failed");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_payment_signature_matches_hmac() {
        assert_eq!(
            payment_signature(SECRET, "order_Nx1", "pay_Qa9"),
            Some(sign("order_Nx1", "pay_Qa9"))
        );
    }

    #[test]
    fn test_valid_signature() {
        let signature = sign("order_Nx1", "pay_Qa9");
        assert!(verify_payment_signature(SECRET, "order_Nx1", "pay_Qa9", &signature));
    }

    #[test]
    fn test_invalid_signature() {
        let signature = sign("order_Nx1", "pay_Qa9");
        assert!(!verify_payment_signature(SECRET, "order_Nx1", "pay_other", &signature));
        assert!(!verify_payment_signature("another-key", "order_Nx1", "pay_Qa9", &signature));
        assert!(!verify_payment_signature(SECRET, "order_Nx1", "pay_Qa9", "deadbeef"));
        assert!(!verify_payment_signature(SECRET, "order_Nx1", "pay_Qa9", ""));
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc", "abc"));
        assert!(!constant_time_compare("abc", "abd"));
        assert!(!constant_time_compare("abc", "abcd"));
    }

    #[test]
    fn test_create_order_body() {
        let order = CreateOrder {
            amount: 899_900,
            currency: "INR",
            payment_capture: 1,
            notes: BTreeMap::from([
                ("saree_id", "1".to_owned()),
                ("saree_name", "Kanchipuram Royal Maroon".to_owned()),
            ]),
        };
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "amount": 899_900,
                "currency": "INR",
                "payment_capture": 1,
                "notes": {"saree_id": "1", "saree_name": "Kanchipuram Royal Maroon"}
            })
        );
    }
}
