//! Site settings storage.

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

impl From<SettingsRow> for SiteSettings {
    fn from(row: SettingsRow) -> Self {
        Self {
            store_name: row.store_name,
            tagline: row.tagline,
            contact_email: row.contact_email,
            contact_phone: row.contact_phone,
            whatsapp_number: row.whatsapp_number,
            address: row.address,
            updated_at: Some(row.updated_at),
        }
    }
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

    /// Current settings, or the defaults when nothing has been saved.
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

        Ok(row.map_or_else(SiteSettings::default, SiteSettings::from))
    }

    /// Save the settings row, creating it on first save.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert(&self, settings: &SiteSettings) -> Result<SiteSettings, RepositoryError> {
        let row = sqlx::query_as::<_, SettingsRow>(
            r"
            INSERT INTO shop.site_settings
                (id, store_name, tagline, contact_email, contact_phone, whatsapp_number, address)
            VALUES (1, $1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                store_name = EXCLUDED.store_name,
                tagline = EXCLUDED.tagline,
                contact_email = EXCLUDED.contact_email,
                contact_phone = EXCLUDED.contact_phone,
                whatsapp_number = EXCLUDED.whatsapp_number,
                address = EXCLUDED.address,
                updated_at = NOW()
            RETURNING store_name, tagline, contact_email, contact_phone,
                      whatsapp_number, address, updated_at
            ",
        )
        .bind(&settings.store_name)
        .bind(&settings.tagline)
        .bind(settings.contact_email.as_deref())
        .bind(settings.contact_phone.as_deref())
        .bind(settings.whatsapp_number.as_deref())
        .bind(settings.address.as_deref())
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Insert the default settings row if none exists.
    ///
    /// Returns `true` when a row was inserted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn ensure_default(&self) -> Result<bool, RepositoryError> {
        let defaults = SiteSettings::default();
        let result = sqlx::query(
            r"
            INSERT INTO shop.site_settings (id, store_name, tagline)
            VALUES (1, $1, $2)
            ON CONFLICT (id) DO NOTHING
            ",
        )
        .bind(&defaults.store_name)
        .bind(&defaults.tagline)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
