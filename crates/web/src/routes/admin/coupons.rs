//! Admin coupon management.

use adlist_core::{CompanyId, CouponId};
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::backend::ApiError;
use crate::backend::coupons::CouponPayload;
use crate::backend::types::Coupon;
use crate::i18n::t;
use crate::middleware::auth::{LOGIN_PATH, RequireAdmin};
use crate::middleware::prefs::Prefs;
use crate::models::{CurrentUser, Flash, session};
use crate::routes::PageChrome;
use crate::routes::categories::PageQuery;
use crate::state::AppState;

/// Coupon row display data.
pub struct CouponRow {
    pub id: String,
    pub company_id: String,
    pub code: String,
    pub discount: String,
    pub active: bool,
    pub expires_at: String,
}

impl From<&Coupon> for CouponRow {
    fn from(coupon: &Coupon) -> Self {
        Self {
            id: coupon.id.to_string(),
            company_id: coupon.company_id.to_string(),
            code: coupon.code.clone(),
            discount: coupon
                .discount_percent
                .map(|p| format!("{p}%"))
                .unwrap_or_default(),
            active: coupon.active,
            expires_at: coupon
                .expires_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_default(),
        }
    }
}

/// Coupon management template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/coupons.html")]
pub struct AdminCouponsTemplate {
    pub chrome: PageChrome,
    pub coupons: Vec<CouponRow>,
    pub page: u32,
    pub has_next: bool,
    /// Field-level messages from a rejected create.
    pub form_errors: Vec<String>,
}

/// Coupon create form.
///
/// Numeric and timestamp fields arrive as strings: an HTML form submits
/// empty strings for blank inputs, which must mean "absent", not a parse
/// failure.
#[derive(Debug, Deserialize)]
pub struct CouponForm {
    pub company_id: i64,
    pub code: String,
    pub description: Option<String>,
    pub discount_percent: Option<String>,
    /// RFC 3339 timestamp; empty means no expiry.
    pub expires_at: Option<String>,
    #[serde(default)]
    pub active: bool,
}

impl From<CouponForm> for CouponPayload {
    fn from(form: CouponForm) -> Self {
        Self {
            company_id: CompanyId::new(form.company_id),
            code: form.code,
            description: form.description.filter(|d| !d.is_empty()),
            discount_percent: form
                .discount_percent
                .and_then(|raw| raw.parse::<u8>().ok()),
            expires_at: form
                .expires_at
                .filter(|raw| !raw.is_empty())
                .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
                .map(|dt| dt.with_timezone(&Utc)),
            active: form.active,
        }
    }
}

async fn render_index(
    state: &AppState,
    prefs: Prefs,
    admin: &CurrentUser,
    token: &str,
    page: u32,
    flash: Option<Flash>,
    form_errors: Vec<String>,
) -> AdminCouponsTemplate {
    let (coupons, has_next) = match state.backend().list_coupons(token, page).await {
        Ok(coupons) => {
            let has_next = coupons.has_next();
            (
                coupons.items.iter().map(CouponRow::from).collect(),
                has_next,
            )
        }
        Err(e) => {
            tracing::error!("Coupon list fetch failed: {e}");
            (Vec::new(), false)
        }
    };

    AdminCouponsTemplate {
        chrome: PageChrome::new(prefs, Some(admin), flash),
        coupons,
        page,
        has_next,
        form_errors,
    }
}

/// Display the coupon list and create form.
///
/// # Route
///
/// `GET /admin/coupons`
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

    let flash = session::take_flash(&http_session).await;
    render_index(&state, prefs, &admin, &token, page, flash, Vec::new())
        .await
        .into_response()
}

/// Create a coupon.
///
/// # Route
///
/// `POST /admin/coupons`
#[instrument(skip(state, prefs, http_session, form))]
pub async fn create(
    State(state): State<AppState>,
    prefs: Prefs,
    RequireAdmin(admin): RequireAdmin,
    http_session: Session,
    Form(form): Form<CouponForm>,
) -> Response {
    let Some(token) = session::access_token(&http_session).await else {
        return Redirect::to(LOGIN_PATH).into_response();
    };

    match state.backend().create_coupon(&token, &form.into()).await {
        Ok(_) => {
            let _ = session::set_flash(
                &http_session,
                Flash::success(t(prefs.lang, "saved")),
            )
            .await;
            Redirect::to("/admin/coupons").into_response()
        }
        Err(ApiError::Validation(errors)) => {
            let form_errors = errors
                .errors
                .iter()
                .flat_map(|(field, msgs)| msgs.iter().map(move |m| format!("{field}: {m}")))
                .collect();
            render_index(&state, prefs, &admin, &token, 1, None, form_errors)
                .await
                .into_response()
        }
        Err(e) => {
            tracing::error!("Coupon create failed: {e}");
            let _ = session::set_flash(
                &http_session,
                Flash::error(t(prefs.lang, "action_failed")),
            )
            .await;
            Redirect::to("/admin/coupons").into_response()
        }
    }
}

/// Delete a coupon.
///
/// # Route
///
/// `POST /admin/coupons/{id}/delete`
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

    let flash = match state.backend().delete_coupon(&token, CouponId::new(id)).await {
        Ok(()) => Flash::success(t(prefs.lang, "deleted")),
        Err(e) => {
            tracing::error!("Coupon delete failed: {e}");
            Flash::error(t(prefs.lang, "action_failed"))
        }
    };

    let _ = session::set_flash(&http_session, flash).await;
    Redirect::to("/admin/coupons").into_response()
}
