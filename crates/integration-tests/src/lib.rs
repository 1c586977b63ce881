//! Integration tests for the Silk Saree store.
//!
//! The tests drive running servers over HTTP and use the database directly
//! for fixtures and cleanup. They are `#[ignore]`d by default.
//!
//! # Running Tests
//!
//! ```bash
//! saree-cli migrate
//! cargo run -p silk-saree-storefront &
//! cargo run -p silk-saree-admin &
//! cargo test -p silk-saree-integration-tests -- --ignored --test-threads=1
//! ```
//!
//! Single-threaded runs keep the admin login rate limit (5 attempts per
//! client address) out of the way.
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - Database shared by both servers
//! - `STOREFRONT_BASE_URL` - default `http://localhost:3000`
//! - `ADMIN_BASE_URL` - default `http://localhost:3001`
//! - `RAZORPAY_KEY_SECRET` - same secret the storefront runs with; leave it
//!   unset when the storefront runs without Razorpay keys

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use reqwest::header::LOCATION;
use reqwest::{Client, Response, StatusCode, redirect};
use secrecy::SecretString;
use sqlx::PgPool;
use uuid::Uuid;

use silk_saree_admin::services::AuthService;

/// Base URL for the storefront (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Base URL for the admin panel (configurable via environment).
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// Razorpay key secret shared with the storefront, if it has keys.
#[must_use]
pub fn razorpay_key_secret() -> Option<String> {
    std::env::var("RAZORPAY_KEY_SECRET")
        .ok()
        .filter(|s| !s.trim().is_empty())
}

/// HTTP client with a cookie jar that does not follow redirects, so tests
/// can assert on `Location`.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// Connect to the database both servers use.
pub async fn pool() -> PgPool {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    silk_saree_admin::db::create_pool(&SecretString::from(database_url))
        .await
        .expect("Failed to connect to database")
}

/// A unique, valid name for fixtures (`it-1a2b3c4d5e6f`).
#[must_use]
pub fn unique_name(prefix: &str) -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("{prefix}-{}", id.get(..12).unwrap_or(&id))
}

/// Assert a `303 See Other` to `location`.
pub fn assert_redirect(resp: &Response, location: &str) {
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some(location)
    );
}

/// An admin user created for one test, removed on [`TestAdmin::cleanup`].
pub struct TestAdmin {
    pub username: String,
    pub password: String,
}

impl TestAdmin {
    /// Create a fresh admin account directly in the database.
    pub async fn create(pool: &PgPool) -> Self {
        let username = unique_name("it");
        let password = format!("pw-{}", Uuid::new_v4());
        AuthService::new(pool)
            .create_admin(&username, &password)
            .await
            .expect("Failed to create test admin");
        Self { username, password }
    }

    /// Log `client` in and check the redirect to the dashboard.
    pub async fn login(&self, client: &Client) {
        let resp = client
            .post(format!("{}/auth/login", admin_base_url()))
            .form(&[
                ("username", self.username.as_str()),
                ("password", self.password.as_str()),
            ])
            .send()
            .await
            .expect("Failed to post login");
        assert_redirect(&resp, "/");
    }

    /// Delete the account.
    pub async fn cleanup(self, pool: &PgPool) {
        sqlx::query("DELETE FROM admin.admin_user WHERE username = $1")
            .bind(&self.username)
            .execute(pool)
            .await
            .expect("Failed to delete test admin");
    }
}

/// Fetch a page and return its body, asserting `200 OK`.
pub async fn get_text(client: &Client, url: &str) -> String {
    let resp = client.get(url).send().await.expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK, "GET {url}");
    resp.text().await.expect("Failed to read response")
}
