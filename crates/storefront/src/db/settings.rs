//! Site settings lookup.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use silk_saree_core::SiteSettings;

use super::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
struct SettingsRow {
    store_name: String,
    tagline: String,
    contact_email: Option<String>,
    contact_phone: Option<String>,
    whatsapp_number: Option<String>,
    address: Option<String>,
    updated_at: DateTime<Utc>,
}

/// Repository for the single `shop.site_settings` row.
pub struct SettingsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SettingsRepository<'a> {
    /// Create a new settings repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Current settings, or the defaults when the row has not been saved.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self) -> Result<SiteSettings, RepositoryError> {
        let row = sqlx::query_as::<_, SettingsRow>(
            r"
            SELECT store_name, tagline, contact_email, contact_phone,
                   whatsapp_number, address, updated_at
            FROM shop.site_settings
            WHERE id = 1
            ",
        )
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map_or_else(SiteSettings::default, |r| SiteSettings {
            store_name: r.store_name,
            tagline: r.tagline,
            contact_email: r.contact_email,
            contact_phone: r.contact_phone,
            whatsapp_number: r.whatsapp_number,
            address: r.address,
            updated_at: Some(r.updated_at),
        }))
    }
}
