//! Site settings form.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, Router, extract::State, response::Redirect, routing::get};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use silk_saree_core::{Email, FlashMessage, SiteSettings};

use super::{Shell, non_blank};
use crate::db::SettingsRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::{RequireAdminAuth, flash};
use crate::state::AppState;

/// Settings page template.
#[derive(Template, WebTemplate)]
#[template(path = "settings.html")]
pub struct SettingsTemplate {
    pub shell: Shell,
    pub settings: SiteSettings,
}

/// Settings form fields.
#[derive(Debug, Default, Deserialize)]
pub struct SettingsForm {
    #[serde(default)]
    pub store_name: String,
    #[serde(default)]
    pub tagline: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub whatsapp_number: Option<String>,
    pub address: Option<String>,
}

impl SettingsForm {
    /// Validate into settings, or the message to flash.
    ///
    /// # Errors
    ///
    /// Returns a user-facing message for a blank store name, a malformed
    /// email or a WhatsApp number without digits.
    pub fn validate(&self) -> std::result::Result<SiteSettings, &'static str> {
        let store_name =
            non_blank(Some(&self.store_name)).ok_or("Please enter the store name.")?;

        let contact_email = non_blank(self.contact_email.as_deref())
            .map(|raw| Email::parse(&raw).map(Email::into_inner))
            .transpose()
            .map_err(|_| "Please enter a valid contact email.")?;

        let whatsapp_number = match non_blank(self.whatsapp_number.as_deref()) {
            None => None,
            Some(raw) => {
                let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
                if digits.is_empty() {
                    return Err("WhatsApp number must contain digits.");
                }
                Some(digits)
            }
        };

        Ok(SiteSettings {
            store_name,
            tagline: non_blank(Some(&self.tagline)).unwrap_or_default(),
            contact_email,
            contact_phone: non_blank(self.contact_phone.as_deref()),
            whatsapp_number,
            address: non_blank(self.address.as_deref()),
            updated_at: None,
        })
    }
}

/// Build the settings router.
pub fn router() -> Router<AppState> {
    Router::new().route("/settings", get(show).post(save))
}

/// Show the settings form.
///
/// GET /settings
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn show(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<SettingsTemplate> {
    let settings = SettingsRepository::new(state.pool()).get().await?;

    Ok(SettingsTemplate {
        shell: Shell::load(admin, &session).await,
        settings,
    })
}

/// Save the settings.
///
/// POST /settings
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn save(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SettingsForm>,
) -> Result<Redirect> {
    match form.validate() {
        Ok(settings) => {
            SettingsRepository::new(state.pool()).upsert(&settings).await?;
            tracing::info!("Site settings saved");
            flash::push(&session, FlashMessage::success("Settings saved.")).await?;
        }
        Err(message) => {
            flash::push(&session, FlashMessage::warning(message)).await?;
        }
    }

    Ok(Redirect::to("/settings"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_normalizes_optional_fields() {
        let form = SettingsForm {
            store_name: " Silk Saree Store ".to_owned(),
            tagline: "Handwoven in Kanchipuram".to_owned(),
            contact_email: Some(" Hello@Silk.IN ".to_owned()),
            contact_phone: Some("   ".to_owned()),
            whatsapp_number: Some("+91 98765 43210".to_owned()),
            address: None,
        };

        let settings = form.validate().unwrap();
        assert_eq!(settings.store_name, "Silk Saree Store");
        assert_eq!(settings.contact_email.as_deref(), Some("Hello@silk.in"));
        assert_eq!(settings.contact_phone, None);
        assert_eq!(settings.whatsapp_number.as_deref(), Some("919876543210"));
    }

    #[test]
    fn test_validate_rejects() {
        assert!(SettingsForm::default().validate().is_err());

        let form = SettingsForm {
            store_name: "Store".to_owned(),
            contact_email: Some("not-an-email".to_owned()),
            ..SettingsForm::default()
        };
        assert_eq!(form.validate(), Err("Please enter a valid contact email."));

        let form = SettingsForm {
            store_name: "Store".to_owned(),
            whatsapp_number: Some("call us".to_owned()),
            ..SettingsForm::default()
        };
        assert_eq!(form.validate(), Err("WhatsApp number must contain digits."));
    }
}
