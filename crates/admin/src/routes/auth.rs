//! Authentication route handlers for admin.
//!
//! Provides the login form, username/password login and logout.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use silk_saree_core::FlashMessage;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{
    OptionalAdminAuth, clear_current_admin, flash, login_rate_limiter, set_current_admin,
};
use crate::models::CurrentAdmin;
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub flashes: Vec<FlashMessage>,
    pub username: String,
}

/// Query parameters for the login page.
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    pub notice: Option<String>,
}

/// Login form fields.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", get(login_page))
        .route(
            "/auth/login",
            post(login).layer(login_rate_limiter()),
        )
        .route("/auth/logout", post(logout))
}

/// Notice text for a `?notice=` code.
fn notice_message(code: &str) -> Option<FlashMessage> {
    match code {
        "login_required" => Some(FlashMessage::info("Please login to continue.")),
        _ => None,
    }
}

/// Render the login page.
///
/// GET /auth/login
#[instrument(skip(session, admin))]
pub async fn login_page(
    OptionalAdminAuth(admin): OptionalAdminAuth,
    session: Session,
    Query(query): Query<LoginQuery>,
) -> Response {
    if admin.is_some() {
        return Redirect::to("/").into_response();
    }

    let mut flashes = flash::take(&session).await;
    flashes.extend(query.notice.as_deref().and_then(notice_message));

    LoginTemplate {
        flashes,
        username: String::new(),
    }
    .into_response()
}

/// Check credentials and start an admin session.
///
/// POST /auth/login
#[instrument(skip(state, session, form), fields(username = %form.username.trim()))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let username = form.username.trim();

    match AuthService::new(state.pool())
        .login(username, &form.password)
        .await
    {
        Ok(user) => {
            let current = CurrentAdmin::from(&user);
            set_current_admin(&session, &current).await?;
            set_sentry_user(current.id.as_i32(), current.username.as_str());
            flash::push(&session, FlashMessage::success("Welcome back!")).await?;

            tracing::info!(admin_id = %current.id, "Admin logged in");
            Ok(Redirect::to("/").into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!("Failed admin login");
            Ok(LoginTemplate {
                flashes: vec![FlashMessage::danger("Invalid username or password.")],
                username: username.to_owned(),
            }
            .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Logout and clear session.
///
/// POST /auth/logout
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_admin(&session).await?;
    clear_sentry_user();
    flash::push(&session, FlashMessage::info("Logged out successfully.")).await?;

    Ok(Redirect::to("/auth/login"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_message() {
        assert_eq!(
            notice_message("login_required").map(|m| m.text),
            Some("Please login to continue.".to_owned())
        );
        assert!(notice_message("anything_else").is_none());
    }
}
