//! Cached site settings.
//!
//! Every storefront page renders the store name and contact details, so the
//! settings row is cached for a minute instead of queried per request.

use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;
use tracing::warn;

use silk_saree_core::SiteSettings;

use crate::db::SettingsRepository;

const TTL: Duration = Duration::from_secs(60);

/// Single-entry TTL cache in front of `shop.site_settings`.
#[derive(Clone)]
pub struct SettingsCache {
    cache: Cache<(), SiteSettings>,
}

impl Default for SettingsCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: Cache::builder().max_capacity(1).time_to_live(TTL).build(),
        }
    }

    /// Current settings. Falls back to the defaults (uncached) if the
    /// database is unavailable.
    pub async fn get(&self, pool: &PgPool) -> SiteSettings {
        if let Some(settings) = self.cache.get(&()).await {
            return settings;
        }

        match SettingsRepository::new(pool).get().await {
            Ok(settings) => {
                self.cache.insert((), settings.clone()).await;
                settings
            }
            Err(e) => {
                warn!(error = %e, "Failed to load site settings, using defaults");
                SiteSettings::default()
            }
        }
    }
}
