//! Enquiry form submission.

use std::sync::LazyLock;

use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use regex::Regex;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use silk_saree_core::{Email, EnquiryId, FlashMessage, SareeId};

use crate::db::{EnquiryRepository, NewEnquiry};
use crate::error::{Result, add_breadcrumb};
use crate::middleware::flash;
use crate::state::AppState;

/// Optional leading `+`, a digit, then 6-19 digits, spaces or dashes.
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?[0-9][0-9 -]{6,19}$").expect("phone regex is valid")
});

const MAX_NAME_LEN: usize = 120;
const MAX_MESSAGE_LEN: usize = 2000;

/// Enquiry form fields as submitted.
#[derive(Debug, Default, Deserialize)]
pub struct EnquiryForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
}

impl EnquiryForm {
    /// Validate the form into an insertable enquiry.
    ///
    /// # Errors
    ///
    /// Returns the message to flash back to the customer.
    pub fn validate(&self, saree_id: SareeId) -> std::result::Result<NewEnquiry, &'static str> {
        let name = self.name.trim();
        let message = self.message.trim();
        let email = self.email.trim();
        let phone = self.phone.trim();

        if name.is_empty() || message.is_empty() {
            return Err("Please enter your name and a message.");
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err("Please shorten your name.");
        }
        if message.chars().count() > MAX_MESSAGE_LEN {
            return Err("Your message is too long.");
        }
        if email.is_empty() && phone.is_empty() {
            return Err("Please give an email address or phone number so we can reply.");
        }

        let email = if email.is_empty() {
            None
        } else {
            let parsed = Email::parse(email).map_err(|_| "Please enter a valid email address.")?;
            Some(parsed.into_inner())
        };
        let phone = if phone.is_empty() {
            None
        } else if PHONE_RE.is_match(phone) {
            Some(phone.to_owned())
        } else {
            return Err("Please enter a valid phone number.");
        };

        Ok(NewEnquiry {
            saree_id,
            name: name.to_owned(),
            email,
            phone,
            message: message.to_owned(),
        })
    }
}

/// Store an enquiry about a saree and redirect back to its page.
#[instrument(skip(state, session, form))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Form(form): Form<EnquiryForm>,
) -> Result<Redirect> {
    let saree_id = SareeId::new(id);
    let back = format!("/saree/{saree_id}#enquiry");

    let enquiry = match form.validate(saree_id) {
        Ok(enquiry) => enquiry,
        Err(message) => {
            flash::push(&session, FlashMessage::warning(message)).await?;
            return Ok(Redirect::to(&back));
        }
    };

    let enquiry_id: EnquiryId = EnquiryRepository::new(state.pool())
        .create(&enquiry)
        .await?;
    add_breadcrumb(
        "enquiry",
        "Enquiry received",
        &[("saree_id", &saree_id.to_string())],
    );
    tracing::info!(enquiry_id = %enquiry_id, saree_id = %saree_id, "Enquiry received");

    flash::push(
        &session,
        FlashMessage::success("Thank you! We will get back to you soon."),
    )
    .await?;
    Ok(Redirect::to(&back))
}
