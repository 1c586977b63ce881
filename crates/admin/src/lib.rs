//! Silk Saree admin library.
//!
//! Catalog management, order and enquiry review, and site settings,
//! exposed as a library so the router can be tested and the CLI can reuse
//! the repositories and auth service.
//!
//! # Security
//!
//! This crate writes the catalog and stores admin credentials. Run it on a
//! private network or behind TLS (`ADMIN_TLS_CERT` / `ADMIN_TLS_KEY`).

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
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

/// Directory holding the admin CSS/JS assets.
pub const STATIC_DIR: &str = "crates/admin/static";

/// Build the complete admin application.
///
/// Layers, outermost first: Sentry, tracing, request ID, security headers,
/// sessions. The login rate limit is applied in [`routes::auth`].
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.pool(), state.config());
    let upload_dir = state.uploads().dir().to_path_buf();

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
    use axum::http::{Request, StatusCode, header::LOCATION};
    use tower::ServiceExt;

    use super::*;
    use crate::middleware::auth::LOGIN_REQUIRED_REDIRECT;

    fn test_app() -> Router {
        app(AppState::unreachable_for_tests())
    }

    async fn send(method: &str, uri: &str) -> axum::response::Response {
        test_app()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_sets_security_headers() {
        let response = send("GET", "/health").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("content-security-policy"));
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_readiness_reports_unreachable_database() {
        let response = send("GET", "/health/ready").await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_protected_pages_redirect_to_login() {
        for (method, uri) in [
            ("GET", "/"),
            ("GET", "/sarees"),
            ("GET", "/sarees/new"),
            ("POST", "/sarees/1/delete"),
            ("GET", "/categories"),
            ("POST", "/categories/1/delete"),
            ("GET", "/orders"),
            ("GET", "/enquiries"),
            ("POST", "/enquiries/1/delete"),
            ("GET", "/settings"),
        ] {
            let response = send(method, uri).await;
            assert_eq!(response.status(), StatusCode::SEE_OTHER, "{method} {uri}");
            assert_eq!(
                response.headers().get(LOCATION).map(|v| v.as_bytes()),
                Some(LOGIN_REQUIRED_REDIRECT.as_bytes()),
                "{method} {uri}"
            );
        }
    }
}
