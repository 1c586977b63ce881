use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-wide settings shown in the storefront header and footer.
///
/// Stored as a single row; [`SiteSettings::default`] is used until an
/// admin saves the settings form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSettings {
    pub store_name: String,
    pub tagline: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    /// Digits only, in international format, for `wa.me` links.
    pub whatsapp_number: Option<String>,
    pub address: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            store_name: "Silk Saree Store".to_owned(),
            tagline: "Handwoven silk sarees".to_owned(),
            contact_email: None,
            contact_phone: None,
            whatsapp_number: None,
            address: None,
            updated_at: None,
        }
    }
}

impl SiteSettings {
    /// `https://wa.me/...` link when a WhatsApp number is configured.
    #[must_use]
    pub fn whatsapp_link(&self) -> Option<String> {
        let digits: String = self
            .whatsapp_number
            .as_deref()?
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        (!digits.is_empty()).then(|| format!("https://wa.me/{digits}"))
    }
}
