//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AdminConfig;
use crate::services::UploadStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: PgPool,
    uploads: UploadStore,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: AdminConfig, pool: PgPool) -> Self {
        let uploads = UploadStore::new(config.upload_dir.clone());
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                uploads,
            }),
        }
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Image storage for saree uploads.
    #[must_use]
    pub fn uploads(&self) -> &UploadStore {
        &self.inner.uploads
    }
}

#[cfg(test)]
impl AppState {
    /// State whose pool points at a closed port, for router tests that
    /// must not reach a database.
    #[allow(clippy::unwrap_used)]
    pub(crate) fn unreachable_for_tests() -> Self {
        use std::time::Duration;

        use secrecy::SecretString;
        use sqlx::postgres::PgPoolOptions;

        const URL: &str = "postgres://saree@127.0.0.1:1/unreachable";

        let config = AdminConfig {
            database_url: SecretString::from(URL),
            host: "127.0.0.1".parse().unwrap(),
            port: 3001,
            base_url: "http://localhost:3001".to_owned(),
            upload_dir: std::env::temp_dir().join("silk-saree-admin-tests"),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
            tls: None,
        };
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy(URL)
            .unwrap();
        Self::new(config, pool)
    }
}
