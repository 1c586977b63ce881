//! Silk Saree storefront library.
//!
//! The public catalog and Razorpay checkout, exposed as a library so the
//! router can be built and exercised in tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::{
    create_session_layer, request_id_middleware, security_headers_middleware,
};
use crate::state::AppState;

/// Directory holding the fingerprinted CSS/JS assets.
pub const STATIC_DIR: &str = "crates/storefront/static";

/// Build the complete storefront application.
///
/// Layers, outermost first: Sentry, tracing, request ID, security headers,
/// sessions. Rate limits are applied per route group in [`routes`].
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.pool(), state.config());
    let upload_dir = state.config().upload_dir.clone();

    Router::new()
        .merge(routes::routes())
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(session_layer)
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header::CONTENT_TYPE};
    use tower::ServiceExt;

    use super::*;

    const KEY_SECRET: &str = AppState::TEST_KEY_SECRET;

    fn test_app(with_keys: bool) -> Router {
        app(AppState::unreachable_for_tests(with_keys))
    }

    fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .header("x-forwarded-for", "203.0.113.10")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_sets_security_headers() {
        let response = test_app(false)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("content-security-policy"));
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_readiness_reports_unreachable_database() {
        let response = test_app(false)
            .oneshot(
                Request::builder()
                    .uri("/health/ready")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_payment_missing_fields() {
        let response = test_app(true)
            .oneshot(post_json(
                "/payment/success",
                &serde_json::json!({"razorpay_order_id": "order_1"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Invalid payment data.");
    }

    #[tokio::test]
    async fn test_payment_unparseable_body_is_invalid_data() {
        let request = Request::builder()
            .method("POST")
            .uri("/payment/success")
            .header(CONTENT_TYPE, "application/json")
            .header("x-forwarded-for", "203.0.113.11")
            .body(Body::from("{not json"))
            .unwrap();
        let response = test_app(true).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["message"], "Invalid payment data.");
    }

    #[tokio::test]
    async fn test_payment_without_keys() {
        let response = test_app(false)
            .oneshot(post_json(
                "/payment/success",
                &serde_json::json!({
                    "razorpay_order_id": "order_1",
                    "razorpay_payment_id": "pay_1",
                    "razorpay_signature": "deadbeef",
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await["message"],
            "Razorpay is not configured."
        );
    }

    #[tokio::test]
    async fn test_payment_bad_signature_from_form() {
        let request = Request::builder()
            .method("POST")
            .uri("/payment/success")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header("x-forwarded-for", "203.0.113.12")
            .body(Body::from(
                "razorpay_order_id=order_1&razorpay_payment_id=pay_1&razorpay_signature=00ff",
            ))
            .unwrap();
        let response = test_app(true).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["message"],
            "Payment signature verification failed."
        );
    }

    #[tokio::test]
    async fn test_signed_payment_with_database_down_answers_json() {
        let signature =
            services::razorpay::payment_signature(KEY_SECRET, "order_Ox7Kp2", "pay_Qa9").unwrap();
        let response = test_app(true)
            .oneshot(post_json(
                "/payment/success",
                &serde_json::json!({
                    "razorpay_order_id": "order_Ox7Kp2",
                    "razorpay_payment_id": "pay_Qa9",
                    "razorpay_signature": signature,
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).map(|v| v.as_bytes()),
            Some(b"application/json".as_slice())
        );
        let body = json_body(response).await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Internal server error");
    }

    #[tokio::test]
    async fn test_create_order_with_database_down_answers_json() {
        let response = test_app(true)
            .oneshot(post_json("/create-razorpay-order/1", &serde_json::json!({})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await["error"], "Internal server error");
    }
}
