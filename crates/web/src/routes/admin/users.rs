//! Admin user management.

use adlist_core::{Role, UserId};
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::backend::types::BackendUser;
use crate::i18n::t;
use crate::middleware::auth::{LOGIN_PATH, RequireAdmin};
use crate::middleware::prefs::Prefs;
use crate::models::{Flash, session};
use crate::routes::PageChrome;
use crate::routes::categories::PageQuery;
use crate::state::AppState;

/// User row display data.
pub struct UserView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub subscription: String,
    pub created_at: String,
}

impl From<&BackendUser> for UserView {
    fn from(user: &BackendUser) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.to_string(),
            role: user.role.to_string(),
            subscription: format!("{:?}", user.subscription),
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// User management template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/users.html")]
pub struct UsersTemplate {
    pub chrome: PageChrome,
    pub users: Vec<UserView>,
    pub page: u32,
    pub has_next: bool,
}

/// Role change form.
#[derive(Debug, Deserialize)]
pub struct RoleForm {
    pub role: String,
}

/// Display the user list.
///
/// # Route
///
/// `GET /admin/users`
#[instrument(skip(state, prefs, http_session))]
pub async fn index(
    State(state): State<AppState>,
    prefs: Prefs,
    RequireAdmin(admin): RequireAdmin,
    http_session: Session,
    Query(query): Query<PageQuery>,
) -> Response {
    let Some(token) = session::access_token(&http_session).await else {
        return Redirect::to(LOGIN_PATH).into_response();
    };
    let page = query.page.unwrap_or(1).max(1);

    let users = match state.backend().list_users(&token, page).await {
        Ok(users) => users,
        Err(e) => {
            tracing::error!("User list fetch failed: {e}");
            let _ = session::set_flash(
                &http_session,
                Flash::error(t(prefs.lang, "action_failed")),
            )
            .await;
            return Redirect::to("/admin").into_response();
        }
    };

    let flash = session::take_flash(&http_session).await;
    UsersTemplate {
        chrome: PageChrome::new(prefs, Some(&admin), flash),
        users: users.items.iter().map(UserView::from).collect(),
        page,
        has_next: users.has_next(),
    }
    .into_response()
}

/// Change a user's role.
///
/// # Route
///
/// `POST /admin/users/{id}/role`
#[instrument(skip(state, prefs, http_session, form))]
pub async fn update_role(
    State(state): State<AppState>,
    prefs: Prefs,
    RequireAdmin(_admin): RequireAdmin,
    http_session: Session,
    Path(id): Path<i64>,
    Form(form): Form<RoleForm>,
) -> Response {
    let Some(token) = session::access_token(&http_session).await else {
        return Redirect::to(LOGIN_PATH).into_response();
    };

    let Ok(role) = form.role.parse::<Role>() else {
        let _ = session::set_flash(
            &http_session,
            Flash::error(t(prefs.lang, "action_failed")),
        )
        .await;
        return Redirect::to("/admin/users").into_response();
    };

    let flash = match state
        .backend()
        .update_user_role(&token, UserId::new(id), role)
        .await
    {
        Ok(_) => Flash::success(t(prefs.lang, "saved")),
        Err(e) => {
            tracing::error!("Role update failed: {e}");
            Flash::error(t(prefs.lang, "action_failed"))
        }
    };

    let _ = session::set_flash(&http_session, flash).await;
    Redirect::to("/admin/users").into_response()
}

/// Delete a user.
///
/// # Route
///
/// `POST /admin/users/{id}/delete`
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

    let flash = match state.backend().delete_user(&token, UserId::new(id)).await {
        Ok(()) => Flash::success(t(prefs.lang, "deleted")),
        Err(e) => {
            tracing::error!("User delete failed: {e}");
            Flash::error(t(prefs.lang, "action_failed"))
        }
    };

    let _ = session::set_flash(&http_session, flash).await;
    Redirect::to("/admin/users").into_response()
}
