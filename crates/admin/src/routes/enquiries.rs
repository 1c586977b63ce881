//! Enquiry triage: list, change status, delete.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Path, State},
    response::Redirect,
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use silk_saree_core::{Enquiry, EnquiryId, EnquiryStatus, FlashMessage};

use super::Shell;
use crate::db::EnquiryRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::{RequireAdminAuth, flash};
use crate::state::AppState;

/// Enquiries page template.
#[derive(Template, WebTemplate)]
#[template(path = "enquiries.html")]
pub struct EnquiriesTemplate {
    pub shell: Shell,
    pub enquiries: Vec<Enquiry>,
    pub statuses: [EnquiryStatus; 3],
}

/// Status change form.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    #[serde(default)]
    pub status: String,
}

/// Build the enquiry router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/enquiries", get(list))
        .route("/enquiries/{id}/status", post(update_status))
        .route("/enquiries/{id}/delete", post(delete))
}

/// List enquiries, newest first.
///
/// GET /enquiries
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn list(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<EnquiriesTemplate> {
    let enquiries = EnquiryRepository::new(state.pool()).list().await?;

    Ok(EnquiriesTemplate {
        shell: Shell::load(admin, &session).await,
        enquiries,
        statuses: EnquiryStatus::ALL,
    })
}

/// Move an enquiry to another status.
///
/// POST /enquiries/{id}/status
#[instrument(skip_all, fields(admin_id = %admin.id, enquiry_id = %id))]
pub async fn update_status(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Form(form): Form<StatusForm>,
) -> Result<Redirect> {
    let Ok(status) = form.status.parse::<EnquiryStatus>() else {
        flash::push(&session, FlashMessage::warning("Unknown enquiry status.")).await?;
        return Ok(Redirect::to("/enquiries"));
    };

    EnquiryRepository::new(state.pool())
        .update_status(EnquiryId::new(id), status)
        .await?;

    flash::push(
        &session,
        FlashMessage::success(format!("Enquiry marked as {}.", status.label())),
    )
    .await?;
    Ok(Redirect::to("/enquiries"))
}

/// Delete an enquiry.
///
/// POST /enquiries/{id}/delete
#[instrument(skip_all, fields(admin_id = %admin.id, enquiry_id = %id))]
pub async fn delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Redirect> {
    EnquiryRepository::new(state.pool())
        .delete(EnquiryId::new(id))
        .await?;

    flash::push(&session, FlashMessage::info("Enquiry deleted.")).await?;
    Ok(Redirect::to("/enquiries"))
}
