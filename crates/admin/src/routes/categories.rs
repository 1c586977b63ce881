//! Category management.

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

use silk_saree_core::{Category, CategoryId, FlashMessage, Slug};

use super::{Shell, non_blank};
use crate::db::{CategoryInput, CategoryRepository, CategoryWithCount, RepositoryError};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{RequireAdminAuth, flash};
use crate::state::AppState;

/// Longest accepted category name.
const MAX_NAME_CHARS: usize = 80;

/// Manage categories template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/list.html")]
pub struct CategoriesTemplate {
    pub shell: Shell,
    pub categories: Vec<CategoryWithCount>,
}

/// Add/edit category form template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/form.html")]
pub struct CategoryFormTemplate {
    pub shell: Shell,
    pub page_title: &'static str,
    pub action: String,
    pub category: Option<Category>,
}

/// Category form fields.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl CategoryForm {
    /// Validate into repository input, or the message to flash.
    ///
    /// # Errors
    ///
    /// Returns a user-facing message when the name is blank, too long or
    /// has no letters or digits.
    pub fn validate(&self) -> std::result::Result<CategoryInput, &'static str> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Please enter a category name.");
        }
        if name.chars().count() > MAX_NAME_CHARS {
            return Err("Category names can be at most 80 characters.");
        }
        let slug =
            Slug::from_name(name).map_err(|_| "Category names need at least one letter or digit.")?;

        Ok(CategoryInput {
            name: name.to_owned(),
            slug,
            description: non_blank(Some(&self.description)).unwrap_or_default(),
        })
    }
}

const DUPLICATE_NAME: &str = "A category with that name already exists.";

/// Build the category router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list))
        .route("/categories/new", get(new_form).post(create))
        .route("/categories/{id}/edit", get(edit_form).post(update))
        .route("/categories/{id}/delete", post(delete))
}

/// List categories with saree counts.
///
/// GET /categories
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn list(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<CategoriesTemplate> {
    let categories = CategoryRepository::new(state.pool()).list_with_counts().await?;

    Ok(CategoriesTemplate {
        shell: Shell::load(admin, &session).await,
        categories,
    })
}

/// Show the add form.
///
/// GET /categories/new
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn new_form(
    RequireAdminAuth(admin): RequireAdminAuth,
    session: Session,
) -> CategoryFormTemplate {
    CategoryFormTemplate {
        shell: Shell::load(admin, &session).await,
        page_title: "Add Category",
        action: "/categories/new".to_owned(),
        category: None,
    }
}

/// Add a category.
///
/// POST /categories/new
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CategoryForm>,
) -> Result<Redirect> {
    const BACK: &str = "/categories/new";

    let input = match form.validate() {
        Ok(input) => input,
        Err(message) => {
            flash::push(&session, FlashMessage::warning(message)).await?;
            return Ok(Redirect::to(BACK));
        }
    };

    match CategoryRepository::new(state.pool()).create(&input).await {
        Ok(category) => {
            tracing::info!(category_id = %category.id, "Category added");
            flash::push(&session, FlashMessage::success("Category added.")).await?;
            Ok(Redirect::to("/categories"))
        }
        Err(RepositoryError::Conflict(_)) => {
            flash::push(&session, FlashMessage::danger(DUPLICATE_NAME)).await?;
            Ok(Redirect::to(BACK))
        }
        Err(e) => Err(e.into()),
    }
}

/// Show the edit form.
///
/// GET /categories/{id}/edit
#[instrument(skip_all, fields(admin_id = %admin.id, category_id = %id))]
pub async fn edit_form(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<CategoryFormTemplate> {
    let id = CategoryId::new(id);
    let category = CategoryRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("category {id}")))?;

    Ok(CategoryFormTemplate {
        shell: Shell::load(admin, &session).await,
        page_title: "Edit Category",
        action: format!("/categories/{id}/edit"),
        category: Some(category),
    })
}

/// Update a category.
///
/// POST /categories/{id}/edit
#[instrument(skip_all, fields(admin_id = %admin.id, category_id = %id))]
pub async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Form(form): Form<CategoryForm>,
) -> Result<Redirect> {
    let id = CategoryId::new(id);
    let back = format!("/categories/{id}/edit");

    let input = match form.validate() {
        Ok(input) => input,
        Err(message) => {
            flash::push(&session, FlashMessage::warning(message)).await?;
            return Ok(Redirect::to(&back));
        }
    };

    match CategoryRepository::new(state.pool()).update(id, &input).await {
        Ok(_) => {
            flash::push(&session, FlashMessage::success("Category updated.")).await?;
            Ok(Redirect::to("/categories"))
        }
        Err(RepositoryError::Conflict(_)) => {
            flash::push(&session, FlashMessage::danger(DUPLICATE_NAME)).await?;
            Ok(Redirect::to(&back))
        }
        Err(e) => Err(e.into()),
    }
}

/// Delete a category that no saree uses.
///
/// POST /categories/{id}/delete
#[instrument(skip_all, fields(admin_id = %admin.id, category_id = %id))]
pub async fn delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Redirect> {
    match CategoryRepository::new(state.pool())
        .delete(CategoryId::new(id))
        .await
    {
        Ok(()) => {
            flash::push(&session, FlashMessage::info("Category deleted.")).await?;
        }
        Err(RepositoryError::Conflict(_)) => {
            flash::push(
                &session,
                FlashMessage::danger("Category still has sarees. Move or delete them first."),
            )
            .await?;
        }
        Err(e) => return Err(e.into()),
    }

    Ok(Redirect::to("/categories"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(name: &str, description: &str) -> CategoryForm {
        CategoryForm {
            name: name.to_owned(),
            description: description.to_owned(),
        }
    }

    #[test]
    fn test_validate_builds_slug() {
        let input = form("  Kanchipuram Silk ", " Temple borders ").validate().unwrap();
        assert_eq!(input.name, "Kanchipuram Silk");
        assert_eq!(input.slug.as_str(), "kanchipuram-silk");
        assert_eq!(input.description, "Temple borders");
    }

    #[test]
    fn test_validate_rejects_bad_names() {
        assert_eq!(form("  ", "").validate(), Err("Please enter a category name."));
        assert!(form(&"a".repeat(81), "").validate().is_err());
        assert!(form("---", "").validate().is_err());
    }
}
