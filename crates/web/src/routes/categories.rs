//! Category browsing routes.

use adlist_core::CategoryId;
use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::home::{CategoryView, CompanyView};
use crate::filters;
use crate::error::{AppError, Result};
use crate::middleware::auth::OptionalAuth;
use crate::middleware::prefs::Prefs;
use crate::models::session;
use crate::state::AppState;

/// Pagination query.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
}

/// Category listing template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/index.html")]
pub struct CategoriesTemplate {
    pub chrome: super::PageChrome,
    pub categories: Vec<CategoryView>,
}

/// Category detail template (companies in the category).
#[derive(Template, WebTemplate)]
#[template(path = "categories/show.html")]
pub struct CategoryTemplate {
    pub chrome: super::PageChrome,
    pub category: CategoryView,
    pub companies: Vec<CompanyView>,
    pub page: u32,
    pub has_next: bool,
}

/// Display all categories.
#[instrument(skip(state, prefs, user, http_session))]
pub async fn index(
    State(state): State<AppState>,
    prefs: Prefs,
    OptionalAuth(user): OptionalAuth,
    http_session: Session,
) -> Result<CategoriesTemplate> {
    let categories = state.backend().list_categories().await?;

    let flash = session::take_flash(&http_session).await;
    Ok(CategoriesTemplate {
        chrome: super::PageChrome::new(prefs, user.as_ref(), flash),
        categories: categories.iter().map(CategoryView::from).collect(),
    })
}

/// Display the companies listed under one category.
#[instrument(skip(state, prefs, user, http_session))]
pub async fn show(
    State(state): State<AppState>,
    prefs: Prefs,
    OptionalAuth(user): OptionalAuth,
    http_session: Session,
    Path(id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> Result<CategoryTemplate> {
    let id = CategoryId::new(id);
    let page = query.page.unwrap_or(1).max(1);

    let category = state
        .backend()
        .get_category(id)
        .await
        .map_err(|_| AppError::NotFound(format!("category {id}")))?;
    let companies = state.backend().list_companies(Some(id), page).await?;

    let flash = session::take_flash(&http_session).await;
    Ok(CategoryTemplate {
        chrome: super::PageChrome::new(prefs, user.as_ref(), flash),
        category: CategoryView::from(&category),
        companies: companies.items.iter().map(CompanyView::from).collect(),
        page,
        has_next: companies.has_next(),
    })
}
