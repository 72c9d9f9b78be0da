//! Notification page and actions (requires auth).

use adlist_core::NotificationId;
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::backend::types::Notification;
use crate::middleware::auth::{LOGIN_PATH, RequireAuth};
use crate::middleware::prefs::Prefs;
use crate::models::session;
use crate::state::AppState;

/// Notification display data for templates.
pub struct NotificationView {
    pub id: String,
    pub message: String,
    pub kind: String,
    pub read: bool,
    pub created_at: String,
}

impl From<&Notification> for NotificationView {
    fn from(notification: &Notification) -> Self {
        Self {
            id: notification.id.to_string(),
            message: notification.message.clone(),
            kind: notification.kind.as_str().to_string(),
            read: notification.read,
            created_at: notification.created_at.to_rfc3339(),
        }
    }
}

/// Notification list template.
#[derive(Template, WebTemplate)]
#[template(path = "notifications.html")]
pub struct NotificationsTemplate {
    pub chrome: super::PageChrome,
    pub items: Vec<NotificationView>,
    pub unread_count: u32,
    /// Inline error from the last failed store operation, shown above the
    /// (still visible) previous list.
    pub error: String,
}

/// Display the caller's notifications.
///
/// # Route
///
/// `GET /notifications`
#[instrument(skip(state, prefs, http_session))]
pub async fn index(
    State(state): State<AppState>,
    prefs: Prefs,
    RequireAuth(user): RequireAuth,
    http_session: Session,
) -> Response {
    let Some(token) = session::access_token(&http_session).await else {
        return Redirect::to(LOGIN_PATH).into_response();
    };

    let snapshot = state.notifications().fetch(user.id, &token).await;

    let flash = session::take_flash(&http_session).await;
    NotificationsTemplate {
        chrome: super::PageChrome::new(prefs, Some(&user), flash),
        items: snapshot.items.iter().map(NotificationView::from).collect(),
        unread_count: snapshot.unread_count,
        error: snapshot.error.unwrap_or_default(),
    }
    .into_response()
}

/// Mark one notification read.
///
/// # Route
///
/// `POST /notifications/{id}/read`
#[instrument(skip(state, http_session))]
pub async fn mark_read(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    http_session: Session,
    Path(id): Path<i64>,
) -> Response {
    let Some(token) = session::access_token(&http_session).await else {
        return Redirect::to(LOGIN_PATH).into_response();
    };

    state
        .notifications()
        .mark_read(user.id, &token, NotificationId::new(id))
        .await;

    Redirect::to("/notifications").into_response()
}

/// Mark every notification read.
///
/// # Route
///
/// `POST /notifications/read-all`
#[instrument(skip(state, http_session))]
pub async fn mark_all_read(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    http_session: Session,
) -> Response {
    let Some(token) = session::access_token(&http_session).await else {
        return Redirect::to(LOGIN_PATH).into_response();
    };

    state.notifications().mark_all_read(user.id, &token).await;

    Redirect::to("/notifications").into_response()
}

/// Delete a notification.
///
/// # Route
///
/// `POST /notifications/{id}/delete`
#[instrument(skip(state, http_session))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    http_session: Session,
    Path(id): Path<i64>,
) -> Response {
    let Some(token) = session::access_token(&http_session).await else {
        return Redirect::to(LOGIN_PATH).into_response();
    };

    state
        .notifications()
        .remove(user.id, &token, NotificationId::new(id))
        .await;

    Redirect::to("/notifications").into_response()
}
