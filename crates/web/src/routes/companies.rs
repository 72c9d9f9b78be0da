//! Company profile routes.

use adlist_core::CompanyId;
use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tower_sessions::Session;
use tracing::instrument;

use super::home::CompanyView;
use crate::filters;
use crate::backend::types::Coupon;
use crate::error::{AppError, Result};
use crate::middleware::auth::OptionalAuth;
use crate::middleware::prefs::Prefs;
use crate::models::session;
use crate::state::AppState;

/// Coupon display data for templates.
pub struct CouponView {
    pub code: String,
    pub description: String,
    pub discount: String,
    pub expires_at: String,
}

impl From<&Coupon> for CouponView {
    fn from(coupon: &Coupon) -> Self {
        Self {
            code: coupon.code.clone(),
            description: coupon.description.clone().unwrap_or_default(),
            discount: coupon
                .discount_percent
                .map(|p| format!("{p}%"))
                .unwrap_or_default(),
            expires_at: coupon
                .expires_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_default(),
        }
    }
}

/// Company profile template.
#[derive(Template, WebTemplate)]
#[template(path = "companies/show.html")]
pub struct CompanyTemplate {
    pub chrome: super::PageChrome,
    pub company: CompanyView,
    pub phone: String,
    pub coupons: Vec<CouponView>,
}

/// Display one company's profile with its active coupons.
#[instrument(skip(state, prefs, user, http_session))]
pub async fn show(
    State(state): State<AppState>,
    prefs: Prefs,
    OptionalAuth(user): OptionalAuth,
    http_session: Session,
    Path(id): Path<i64>,
) -> Result<CompanyTemplate> {
    let id = CompanyId::new(id);

    let company = state
        .backend()
        .get_company(id)
        .await
        .map_err(|_| AppError::NotFound(format!("company {id}")))?;

    // Coupons are best-effort: the profile renders without them
    let coupons = state.backend().company_coupons(id).await.map_or_else(
        |e| {
            tracing::error!("Failed to fetch coupons for company {id}: {e}");
            Vec::new()
        },
        |coupons| {
            coupons
                .iter()
                .filter(|c| c.active)
                .map(CouponView::from)
                .collect()
        },
    );

    let flash = session::take_flash(&http_session).await;
    Ok(CompanyTemplate {
        chrome: super::PageChrome::new(prefs, user.as_ref(), flash),
        phone: company.phone.clone().unwrap_or_default(),
        company: CompanyView::from(&company),
        coupons,
    })
}
