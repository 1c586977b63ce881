//! Saree management: list, add, edit and delete.
//!
//! Add and edit forms are `multipart/form-data` because they carry the
//! image. Validation failures flash a message and redirect back to the form.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, Path, State, multipart::MultipartError},
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
};
use rust_decimal::Decimal;
use tower_sessions::Session;
use tracing::instrument;

use silk_saree_core::{Category, CategoryId, FlashMessage, Price, Saree, SareeId};

use super::{Shell, non_blank};
use crate::db::{CategoryRepository, RepositoryError, SareeInput, SareeRepository};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{RequireAdminAuth, flash};
use crate::services::UploadError;
use crate::services::uploads::MAX_UPLOAD_BYTES;
use crate::state::AppState;

/// Room for the text fields and multipart framing around the image.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

const MISSING_FIELDS: &str = "Please fill all fields and upload an image.";
const INVALID_PRICE: &str = "Please enter a valid price, e.g. 8999 or 8999.50.";
const INVALID_CATEGORY: &str = "Please choose a valid category.";
const IMAGE_TOO_LARGE: &str = "Images must be 5 MB or smaller.";

/// Saree row in the management table.
#[derive(Debug, Clone)]
pub struct SareeRowView {
    pub id: SareeId,
    pub name: String,
    pub price: String,
    pub image_url: String,
    pub category: Option<String>,
}

/// Manage sarees template.
#[derive(Template, WebTemplate)]
#[template(path = "sarees/list.html")]
pub struct SareesTemplate {
    pub shell: Shell,
    pub sarees: Vec<SareeRowView>,
}

/// Current values shown in the edit form.
#[derive(Debug, Clone)]
pub struct SareeFormValues {
    pub id: SareeId,
    pub name: String,
    pub price: Decimal,
    pub description: String,
    pub category_id: Option<CategoryId>,
    pub image_url: String,
}

/// Add/edit saree form template.
#[derive(Template, WebTemplate)]
#[template(path = "sarees/form.html")]
pub struct SareeFormTemplate {
    pub shell: Shell,
    pub page_title: &'static str,
    pub action: String,
    pub categories: Vec<Category>,
    /// `None` when adding.
    pub saree: Option<SareeFormValues>,
}

impl SareeFormTemplate {
    /// Whether `id` is the saree's current category.
    #[must_use]
    pub fn is_selected(&self, id: &CategoryId) -> bool {
        self.saree
            .as_ref()
            .is_some_and(|s| s.category_id == Some(*id))
    }
}

/// Uploaded image part.
#[derive(Debug, Clone)]
pub struct ImagePart {
    pub filename: String,
    pub bytes: Bytes,
}

/// Raw multipart fields of the add/edit form.
#[derive(Debug, Default)]
pub struct SareeForm {
    pub name: Option<String>,
    pub price: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<String>,
    /// `None` when no file was chosen.
    pub image: Option<ImagePart>,
}

impl SareeForm {
    /// Read all fields from a multipart body.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Upload(TooLarge)` when the body exceeds the limit
    /// and `AppError::BadRequest` for malformed bodies.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            if name == "image" {
                let filename = field.file_name().unwrap_or_default().to_owned();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                if !filename.is_empty() && !bytes.is_empty() {
                    form.image = Some(ImagePart { filename, bytes });
                }
                continue;
            }

            let value = field.text().await.map_err(multipart_error)?;
            match name.as_str() {
                "name" => form.name = Some(value),
                "price" => form.price = Some(value),
                "description" => form.description = Some(value),
                "category_id" => form.category_id = Some(value),
                _ => {}
            }
        }

        Ok(form)
    }
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::Upload(UploadError::TooLarge)
    } else {
        AppError::BadRequest(e.body_text())
    }
}

/// Parse the category select value; blank means uncategorized.
fn parse_category(value: Option<&str>) -> std::result::Result<Option<CategoryId>, ()> {
    match non_blank(value) {
        None => Ok(None),
        Some(v) => v.parse::<i32>().map(|id| Some(CategoryId::new(id))).map_err(|_| ()),
    }
}

/// Message shown when an upload is rejected for a client-side reason.
fn upload_message(error: &UploadError) -> Option<&'static str> {
    match error {
        UploadError::InvalidFilename | UploadError::UnsupportedExtension(_) => {
            Some("Please upload a JPG, PNG, GIF or WebP image.")
        }
        UploadError::Empty => Some("The uploaded image is empty."),
        UploadError::TooLarge => Some(IMAGE_TOO_LARGE),
        UploadError::Io(_) => None,
    }
}

/// Flash a warning and redirect to `to`.
async fn reject(session: &Session, message: &str, to: &str) -> Result<Redirect> {
    flash::push(session, FlashMessage::warning(message)).await?;
    Ok(Redirect::to(to))
}

/// Build the saree router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sarees", get(list))
        .route("/sarees/new", get(new_form).post(create))
        .route("/sarees/{id}/edit", get(edit_form).post(update))
        .route("/sarees/{id}/delete", post(delete))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + FORM_OVERHEAD_BYTES))
}

/// List sarees, newest first.
///
/// GET /sarees
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn list(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<SareesTemplate> {
    let sarees = SareeRepository::new(state.pool()).list().await?;
    let categories = CategoryRepository::new(state.pool()).list().await?;

    let sarees = sarees
        .iter()
        .map(|s| SareeRowView {
            id: s.id,
            name: s.name.clone(),
            price: s.price().display(),
            image_url: s.image_url(),
            category: s.category_id.and_then(|id| {
                categories
                    .iter()
                    .find(|c| c.id == id)
                    .map(|c| c.name.clone())
            }),
        })
        .collect();

    Ok(SareesTemplate {
        shell: Shell::load(admin, &session).await,
        sarees,
    })
}

/// Show the add form.
///
/// GET /sarees/new
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn new_form(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<SareeFormTemplate> {
    let categories = CategoryRepository::new(state.pool()).list().await?;

    Ok(SareeFormTemplate {
        shell: Shell::load(admin, &session).await,
        page_title: "Add Saree",
        action: "/sarees/new".to_owned(),
        categories,
        saree: None,
    })
}

/// Add a saree.
///
/// POST /sarees/new
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    multipart: Multipart,
) -> Result<Redirect> {
    const BACK: &str = "/sarees/new";

    let form = match SareeForm::from_multipart(multipart).await {
        Ok(form) => form,
        Err(AppError::Upload(UploadError::TooLarge)) => {
            return reject(&session, IMAGE_TOO_LARGE, BACK).await;
        }
        Err(e) => return Err(e),
    };

    let (Some(name), Some(price), Some(description), Some(image)) = (
        non_blank(form.name.as_deref()),
        non_blank(form.price.as_deref()),
        non_blank(form.description.as_deref()),
        form.image,
    ) else {
        return reject(&session, MISSING_FIELDS, BACK).await;
    };

    let Ok(price) = Price::parse_amount(&price) else {
        return reject(&session, INVALID_PRICE, BACK).await;
    };
    let Ok(category_id) = parse_category(form.category_id.as_deref()) else {
        return reject(&session, INVALID_CATEGORY, BACK).await;
    };

    let image_filename = match state.uploads().save(&image.filename, &image.bytes).await {
        Ok(stored) => stored,
        Err(e) => match upload_message(&e) {
            Some(message) => return reject(&session, message, BACK).await,
            None => return Err(e.into()),
        },
    };

    let input = SareeInput {
        category_id,
        name,
        price,
        description,
        image_filename,
    };

    match SareeRepository::new(state.pool()).create(&input).await {
        Ok(saree) => {
            tracing::info!(saree_id = %saree.id, "Saree added");
            flash::push(&session, FlashMessage::success("Saree added successfully.")).await?;
            Ok(Redirect::to("/sarees"))
        }
        Err(e) => {
            state.uploads().remove(&input.image_filename).await;
            match e {
                RepositoryError::NotFound => reject(&session, INVALID_CATEGORY, BACK).await,
                other => Err(other.into()),
            }
        }
    }
}

async fn load_saree(state: &AppState, id: SareeId) -> Result<Saree> {
    SareeRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("saree {id}")))
}

/// Show the edit form.
///
/// GET /sarees/{id}/edit
#[instrument(skip_all, fields(admin_id = %admin.id, saree_id = %id))]
pub async fn edit_form(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<SareeFormTemplate> {
    let id = SareeId::new(id);
    let saree = load_saree(&state, id).await?;
    let categories = CategoryRepository::new(state.pool()).list().await?;

    Ok(SareeFormTemplate {
        shell: Shell::load(admin, &session).await,
        page_title: "Edit Saree",
        action: format!("/sarees/{id}/edit"),
        categories,
        saree: Some(SareeFormValues {
            id: saree.id,
            image_url: saree.image_url(),
            name: saree.name,
            price: saree.price,
            description: saree.description,
            category_id: saree.category_id,
        }),
    })
}

/// Update a saree. Blank fields keep their current value; a new image
/// replaces the old one.
///
/// POST /sarees/{id}/edit
#[instrument(skip_all, fields(admin_id = %admin.id, saree_id = %id))]
pub async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Redirect> {
    let id = SareeId::new(id);
    let back = format!("/sarees/{id}/edit");
    let current = load_saree(&state, id).await?;
    let form = match SareeForm::from_multipart(multipart).await {
        Ok(form) => form,
        Err(AppError::Upload(UploadError::TooLarge)) => {
            return reject(&session, IMAGE_TOO_LARGE, &back).await;
        }
        Err(e) => return Err(e),
    };

    let price = match non_blank(form.price.as_deref()) {
        None => current.price,
        Some(raw) => match Price::parse_amount(&raw) {
            Ok(price) => price,
            Err(_) => return reject(&session, INVALID_PRICE, &back).await,
        },
    };
    let category_id = match form.category_id.as_deref() {
        None => current.category_id,
        Some(raw) => match parse_category(Some(raw)) {
            Ok(category_id) => category_id,
            Err(()) => return reject(&session, INVALID_CATEGORY, &back).await,
        },
    };

    let new_image = match form.image {
        None => None,
        Some(image) => match state.uploads().save(&image.filename, &image.bytes).await {
            Ok(stored) => Some(stored),
            Err(e) => match upload_message(&e) {
                Some(message) => return reject(&session, message, &back).await,
                None => return Err(e.into()),
            },
        },
    };

    let input = SareeInput {
        category_id,
        name: non_blank(form.name.as_deref()).unwrap_or_else(|| current.name.clone()),
        price,
        description: non_blank(form.description.as_deref())
            .unwrap_or_else(|| current.description.clone()),
        image_filename: new_image
            .clone()
            .unwrap_or_else(|| current.image_filename.clone()),
    };

    match SareeRepository::new(state.pool()).update(id, &input).await {
        Ok(_) => {
            if new_image.is_some() {
                state.uploads().remove(&current.image_filename).await;
            }
            tracing::info!("Saree updated");
            flash::push(&session, FlashMessage::success("Saree updated successfully.")).await?;
            Ok(Redirect::to("/sarees"))
        }
        Err(e) => {
            if let Some(stored) = &new_image {
                state.uploads().remove(stored).await;
            }
            Err(e.into())
        }
    }
}

/// Delete a saree and its image.
///
/// POST /sarees/{id}/delete
#[instrument(skip_all, fields(admin_id = %admin.id, saree_id = %id))]
pub async fn delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Redirect> {
    let id = SareeId::new(id);
    let image_filename = SareeRepository::new(state.pool()).delete(id).await?;
    state.uploads().remove(&image_filename).await;

    tracing::info!("Saree deleted");
    flash::push(&session, FlashMessage::info("Saree deleted.")).await?;
    Ok(Redirect::to("/sarees"))
}
