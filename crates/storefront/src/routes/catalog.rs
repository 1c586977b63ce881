//! Catalog pages: home, category listing and saree details.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tower_sessions::Session;
use tracing::instrument;

use silk_saree_core::{Category, SareeId};

use super::{Layout, SareeCard};
use crate::db::CatalogRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub sarees: Vec<SareeCard>,
}

/// Category listing template.
#[derive(Template, WebTemplate)]
#[template(path = "category.html")]
pub struct CategoryTemplate {
    pub layout: Layout,
    pub category: Category,
    pub sarees: Vec<SareeCard>,
}

/// Saree display data for the details page.
#[derive(Debug, Clone)]
pub struct SareeDetailView {
    pub id: SareeId,
    pub name: String,
    pub price: String,
    pub description: String,
    pub image_url: String,
    pub category: Option<Category>,
}

/// Saree details template.
#[derive(Template, WebTemplate)]
#[template(path = "saree_details.html")]
pub struct SareeDetailsTemplate {
    pub layout: Layout,
    pub saree: SareeDetailView,
    /// Public gateway key; the pay button is hidden without it.
    pub razorpay_key: Option<String>,
}

/// Display all sarees, newest first.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> Result<HomeTemplate> {
    let sarees = CatalogRepository::new(state.pool())
        .list_sarees()
        .await?
        .iter()
        .map(SareeCard::from)
        .collect();
    // Flashes are taken last so a failed query leaves them pending.
    let layout = Layout::load(&state, &session).await?;

    Ok(HomeTemplate { layout, sarees })
}

/// Display the sarees in one category.
#[instrument(skip(state, session))]
pub async fn category(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
) -> Result<CategoryTemplate> {
    let repo = CatalogRepository::new(state.pool());
    let category = repo
        .get_category_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("category {slug}")))?;
    let sarees = repo
        .list_sarees_in_category(category.id)
        .await?
        .iter()
        .map(SareeCard::from)
        .collect();
    let layout = Layout::load(&state, &session).await?;

    Ok(CategoryTemplate {
        layout,
        category,
        sarees,
    })
}

/// Display one saree with the enquiry form and, when configured, the pay button.
#[instrument(skip(state, session))]
pub async fn saree_details(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<SareeDetailsTemplate> {
    let saree = CatalogRepository::new(state.pool())
        .get_saree(SareeId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("saree {id}")))?;
    let layout = Layout::load(&state, &session).await?;

    let category = saree
        .category_id
        .and_then(|category_id| layout.categories.iter().find(|c| c.id == category_id))
        .cloned();

    let saree = SareeDetailView {
        id: saree.id,
        name: saree.name.clone(),
        price: saree.price().display(),
        description: saree.description.clone(),
        image_url: saree.image_url(),
        category,
    };

    Ok(SareeDetailsTemplate {
        layout,
        saree,
        razorpay_key: state.razorpay().map(|client| client.key_id().to_owned()),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::{
        Extension, Router,
        body::Body,
        http::{Request, StatusCode},
        routing::get,
    };
    use tower::ServiceExt;
    use tower_sessions::MemoryStore;

    use silk_saree_core::FlashMessage;

    use super::*;
    use crate::middleware::flash;

    #[tokio::test]
    async fn test_failed_home_keeps_pending_flashes() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        flash::push(&session, FlashMessage::success("Thank you! We will get back to you soon."))
            .await
            .unwrap();

        let app = Router::new()
            .route("/", get(home))
            .layer(Extension(session.clone()))
            .with_state(AppState::unreachable_for_tests(false));
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(flash::take(&session).await.len(), 1);
    }
}
