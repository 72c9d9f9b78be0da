//! Admin analytics dashboard.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::backend::types::AnalyticsSummary;
use crate::middleware::auth::{LOGIN_PATH, RequireAdmin};
use crate::middleware::prefs::Prefs;
use crate::models::session;
use crate::routes::PageChrome;
use crate::state::AppState;

/// A dated point in the sign-up sparkline.
pub struct SignupPoint {
    pub date: String,
    pub count: u64,
}

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub chrome: PageChrome,
    pub total_users: u64,
    pub total_companies: u64,
    pub total_coupons: u64,
    pub active_subscriptions: u64,
    pub signups: Vec<SignupPoint>,
    /// Inline error when the summary fetch failed.
    pub error: String,
}

/// Display the analytics dashboard.
///
/// # Route
///
/// `GET /admin`
#[instrument(skip(state, prefs, http_session))]
pub async fn index(
    State(state): State<AppState>,
    prefs: Prefs,
    RequireAdmin(admin): RequireAdmin,
    http_session: Session,
) -> Response {
    let Some(token) = session::access_token(&http_session).await else {
        return Redirect::to(LOGIN_PATH).into_response();
    };

    let (summary, error) = match state.backend().analytics_summary(&token).await {
        Ok(summary) => (Some(summary), String::new()),
        Err(e) => {
            tracing::error!("Analytics summary fetch failed: {e}");
            (None, e.to_string())
        }
    };

    let summary = summary.unwrap_or(AnalyticsSummary {
        total_users: 0,
        total_companies: 0,
        total_coupons: 0,
        active_subscriptions: 0,
        signups: Vec::new(),
    });

    let flash = session::take_flash(&http_session).await;
    DashboardTemplate {
        chrome: PageChrome::new(prefs, Some(&admin), flash),
        total_users: summary.total_users,
        total_companies: summary.total_companies,
        total_coupons: summary.total_coupons,
        active_subscriptions: summary.active_subscriptions,
        signups: summary
            .signups
            .iter()
            .map(|point| SignupPoint {
                date: point.date.to_string(),
                count: point.count,
            })
            .collect(),
        error,
    }
    .into_response()
}
