//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use silk_saree_core::SiteSettings;

use crate::config::StorefrontConfig;
use crate::services::{RazorpayClient, RazorpayError, SettingsCache};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    razorpay: Option<RazorpayClient>,
    settings: SettingsCache,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the Razorpay HTTP client cannot be built.
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Result<Self, RazorpayError> {
        let razorpay = config
            .razorpay
            .as_ref()
            .map(RazorpayClient::new)
            .transpose()?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                razorpay,
                settings: SettingsCache::new(),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// The payment gateway client, if keys are configured.
    #[must_use]
    pub fn razorpay(&self) -> Option<&RazorpayClient> {
        self.inner.razorpay.as_ref()
    }

    /// Site settings (cached).
    pub async fn site_settings(&self) -> SiteSettings {
        self.inner.settings.get(&self.inner.pool).await
    }
}

#[cfg(test)]
impl AppState {
    /// Key secret of the test gateway account.
    pub(crate) const TEST_KEY_SECRET: &'static str = "Zq8vN3kLm2Xw9Rt5Yb7Pc1Hd";

    /// State whose pool points at a closed port, for router tests that
    /// must not reach a database.
    #[allow(clippy::unwrap_used)]
    pub(crate) fn unreachable_for_tests(with_keys: bool) -> Self {
        use std::time::Duration;

        use secrecy::SecretString;
        use sqlx::postgres::PgPoolOptions;

        use crate::config::RazorpayConfig;

        const URL: &str = "postgres://saree@127.0.0.1:1/unreachable";

        let config = StorefrontConfig {
            database_url: SecretString::from(URL),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_owned(),
            upload_dir: "uploads".into(),
            razorpay: with_keys.then(|| RazorpayConfig {
                key_id: "rzp_test_1DP5mmOlF5G5ag".to_owned(),
                key_secret: SecretString::from(Self::TEST_KEY_SECRET),
            }),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy(URL)
            .unwrap();
        Self::new(config, pool).unwrap()
    }
}
