//! Admin category management.

use adlist_core::CategoryId;
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::backend::ApiError;
use crate::backend::categories::CategoryPayload;
use crate::backend::types::Category;
use crate::i18n::t;
use crate::middleware::auth::{LOGIN_PATH, RequireAdmin};
use crate::middleware::prefs::Prefs;
use crate::models::{CurrentUser, Flash, session};
use crate::routes::PageChrome;
use crate::state::AppState;

/// Category row display data.
pub struct CategoryRow {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub company_count: u64,
}

impl From<&Category> for CategoryRow {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.to_string(),
            name: category.name.clone(),
            slug: category.slug.clone(),
            company_count: category.company_count,
        }
    }
}

/// Category management template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/categories.html")]
pub struct AdminCategoriesTemplate {
    pub chrome: PageChrome,
    pub categories: Vec<CategoryRow>,
    /// Field-level messages from a rejected create, `field: message` pairs.
    pub form_errors: Vec<String>,
}

/// Category form (create and update share the shape).
#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

impl From<CategoryForm> for CategoryPayload {
    fn from(form: CategoryForm) -> Self {
        Self {
            name: form.name,
            slug: form.slug,
            description: form.description.filter(|d| !d.is_empty()),
        }
    }
}

async fn render_index(
    state: &AppState,
    prefs: Prefs,
    admin: &CurrentUser,
    flash: Option<Flash>,
    form_errors: Vec<String>,
) -> AdminCategoriesTemplate {
    let categories = state.backend().list_categories().await.map_or_else(
        |e| {
            tracing::error!("Category list fetch failed: {e}");
            Vec::new()
        },
        |categories| categories.iter().map(CategoryRow::from).collect(),
    );

    AdminCategoriesTemplate {
        chrome: PageChrome::new(prefs, Some(admin), flash),
        categories,
        form_errors,
    }
}

/// Display the category list and create form.
///
/// # Route
///
/// `GET /admin/categories`
#[instrument(skip(state, prefs, http_session))]
pub async fn index(
    State(state): State<AppState>,
    prefs: Prefs,
    RequireAdmin(admin): RequireAdmin,
    http_session: Session,
) -> Response {
    let flash = session::take_flash(&http_session).await;
    render_index(&state, prefs, &admin, flash, Vec::new())
        .await
        .into_response()
}

/// Create a category.
///
/// A validation rejection re-renders the page with the field messages
/// inline; the previously listed categories stay visible.
///
/// # Route
///
/// `POST /admin/categories`
#[instrument(skip(state, prefs, http_session, form))]
pub async fn create(
    State(state): State<AppState>,
    prefs: Prefs,
    RequireAdmin(admin): RequireAdmin,
    http_session: Session,
    Form(form): Form<CategoryForm>,
) -> Response {
    let Some(token) = session::access_token(&http_session).await else {
        return Redirect::to(LOGIN_PATH).into_response();
    };

    match state
        .backend()
        .create_category(&token, &form.into())
        .await
    {
        Ok(_) => {
            let _ = session::set_flash(
                &http_session,
                Flash::success(t(prefs.lang, "saved")),
            )
            .await;
            Redirect::to("/admin/categories").into_response()
        }
        Err(ApiError::Validation(errors)) => {
            let form_errors = errors
                .errors
                .iter()
                .flat_map(|(field, msgs)| msgs.iter().map(move |m| format!("{field}: {m}")))
                .collect();
            render_index(&state, prefs, &admin, None, form_errors)
                .await
                .into_response()
        }
        Err(e) => {
            tracing::error!("Category create failed: {e}");
            let _ = session::set_flash(
                &http_session,
                Flash::error(t(prefs.lang, "action_failed")),
            )
            .await;
            Redirect::to("/admin/categories").into_response()
        }
    }
}

/// Update a category.
///
/// # Route
///
/// `POST /admin/categories/{id}`
#[instrument(skip(state, prefs, http_session, form))]
pub async fn update(
    State(state): State<AppState>,
    prefs: Prefs,
    RequireAdmin(_admin): RequireAdmin,
    http_session: Session,
    Path(id): Path<i64>,
    Form(form): Form<CategoryForm>,
) -> Response {
    let Some(token) = session::access_token(&http_session).await else {
        return Redirect::to(LOGIN_PATH).into_response();
    };

    let flash = match state
        .backend()
        .update_category(&token, CategoryId::new(id), &form.into())
        .await
    {
        Ok(_) => Flash::success(t(prefs.lang, "saved")),
        Err(e) => {
            tracing::error!("Category update failed: {e}");
            Flash::error(t(prefs.lang, "action_failed"))
        }
    };

    let _ = session::set_flash(&http_session, flash).await;
    Redirect::to("/admin/categories").into_response()
}

/// Delete a category.
///
/// # Route
///
/// `POST /admin/categories/{id}/delete`
#[instrument(skip(state, prefs, http_session))]
pub async fn remove(
    State(state): State<AppState>,
    prefs: Prefs,
    RequireAdmin(_admin): RequireAdmin,
    http_session: Session,
    Path(id): Path<i64>,
) -> Response {
    let Some(token) = session::access_token(&http_session).await else {
        return Redirect::to(LOGIN_PATH).into_response();
    };

    let flash = match state
        .backend()
        .delete_category(&token, CategoryId::new(id))
        .await
    {
        Ok(()) => Flash::success(t(prefs.lang, "deleted")),
        Err(e) => {
            tracing::error!("Category delete failed: {e}");
            Flash::error(t(prefs.lang, "action_failed"))
        }
    };

    let _ = session::set_flash(&http_session, flash).await;
    Redirect::to("/admin/categories").into_response()
}
