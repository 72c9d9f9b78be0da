//! Advertiser account area (requires auth).

use adlist_core::PlanId;
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::backend::ApiError;
use crate::backend::companies::CompanyProfilePayload;
use crate::backend::profile::ProfilePayload;
use crate::backend::types::Company;
use crate::filters;
use crate::i18n::t;
use crate::middleware::auth::{LOGIN_PATH, RequireAuth};
use crate::middleware::prefs::Prefs;
use crate::models::{CurrentUser, Flash, session};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Profile update form.
#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    pub name: String,
}

/// Plan subscription form.
#[derive(Debug, Deserialize)]
pub struct SubscribeForm {
    pub plan_id: i64,
}

/// Company listing form.
#[derive(Debug, Deserialize)]
pub struct CompanyForm {
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
}

impl From<CompanyForm> for CompanyProfilePayload {
    fn from(form: CompanyForm) -> Self {
        Self {
            name: form.name,
            description: form.description.filter(|v| !v.is_empty()),
            website: form.website.filter(|v| !v.is_empty()),
            phone: form.phone.filter(|v| !v.is_empty()),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Account overview template.
#[derive(Template, WebTemplate)]
#[template(path = "account/index.html")]
pub struct AccountTemplate {
    pub chrome: super::PageChrome,
    pub name: String,
    pub email: String,
    pub role: String,
    pub subscription_active: bool,
    pub subscription_label: String,
    /// Field-level messages from a rejected profile update.
    pub name_errors: Vec<String>,
    /// Whether this advertiser manages a company listing.
    pub has_company: bool,
    pub company_name: String,
    pub company_description: String,
    pub company_website: String,
    pub company_phone: String,
    /// Messages from a rejected listing update, `field: message` pairs.
    pub company_errors: Vec<String>,
}

fn account_page(
    prefs: Prefs,
    user: &CurrentUser,
    company: Option<&Company>,
    flash: Option<Flash>,
    name_errors: Vec<String>,
    company_errors: Vec<String>,
) -> AccountTemplate {
    AccountTemplate {
        chrome: super::PageChrome::new(prefs, Some(user), flash),
        name: user.name.clone(),
        email: user.email.to_string(),
        role: user.role.to_string(),
        subscription_active: user.subscription.is_active(),
        subscription_label: format!("{:?}", user.subscription),
        name_errors,
        has_company: company.is_some(),
        company_name: company.map(|c| c.name.clone()).unwrap_or_default(),
        company_description: company
            .and_then(|c| c.description.clone())
            .unwrap_or_default(),
        company_website: company.and_then(|c| c.website.clone()).unwrap_or_default(),
        company_phone: company.and_then(|c| c.phone.clone()).unwrap_or_default(),
        company_errors,
    }
}

/// Fetch the advertiser's company listing, when they have one.
async fn load_company(state: &AppState, user: &CurrentUser) -> Option<Company> {
    let id = user.company_id?;
    match state.backend().get_company(id).await {
        Ok(company) => Some(company),
        Err(e) => {
            tracing::warn!("Failed to fetch company {id}: {e}");
            None
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the account overview.
///
/// Refreshes the session copy of the user from the backend so the
/// subscription state shown is current, falling back to the session copy
/// when the backend is unreachable.
///
/// # Route
///
/// `GET /account`
#[instrument(skip(state, prefs, http_session))]
pub async fn index(
    State(state): State<AppState>,
    prefs: Prefs,
    RequireAuth(user): RequireAuth,
    http_session: Session,
) -> Response {
    let user = match session::access_token(&http_session).await {
        Some(token) => match state.backend().current_user(&token).await {
            Ok(fresh) => {
                let fresh = CurrentUser::from(fresh);
                let _ = session::set_user(&http_session, &fresh).await;
                fresh
            }
            Err(e) => {
                tracing::warn!("Falling back to session user, refresh failed: {e}");
                user
            }
        },
        None => user,
    };

    let company = load_company(&state, &user).await;
    let flash = session::take_flash(&http_session).await;
    account_page(prefs, &user, company.as_ref(), flash, Vec::new(), Vec::new()).into_response()
}

/// Update the caller's profile.
///
/// A validation rejection re-renders the form with field messages; other
/// failures flash and leave the page as it was.
///
/// # Route
///
/// `POST /account/profile`
#[instrument(skip(state, prefs, http_session, form))]
pub async fn update_profile(
    State(state): State<AppState>,
    prefs: Prefs,
    RequireAuth(user): RequireAuth,
    http_session: Session,
    Form(form): Form<ProfileForm>,
) -> Response {
    let Some(token) = session::access_token(&http_session).await else {
        return Redirect::to(LOGIN_PATH).into_response();
    };

    let payload = ProfilePayload { name: form.name };
    match state.backend().update_profile(&token, &payload).await {
        Ok(updated) => {
            let updated = CurrentUser::from(updated);
            let _ = session::set_user(&http_session, &updated).await;
            let _ = session::set_flash(
                &http_session,
                Flash::success(t(prefs.lang, "profile_updated")),
            )
            .await;
            Redirect::to("/account").into_response()
        }
        Err(ApiError::Validation(errors)) => {
            let name_errors = errors.field("name").to_vec();
            let company = load_company(&state, &user).await;
            account_page(prefs, &user, company.as_ref(), None, name_errors, Vec::new())
                .into_response()
        }
        Err(e) => {
            tracing::error!("Profile update failed: {e}");
            let _ = session::set_flash(
                &http_session,
                Flash::error(t(prefs.lang, "action_failed")),
            )
            .await;
            Redirect::to("/account").into_response()
        }
    }
}

/// Subscribe to a plan.
///
/// # Route
///
/// `POST /account/subscribe`
#[instrument(skip(state, prefs, http_session))]
pub async fn subscribe(
    State(state): State<AppState>,
    prefs: Prefs,
    RequireAuth(_user): RequireAuth,
    http_session: Session,
    Form(form): Form<SubscribeForm>,
) -> Response {
    let Some(token) = session::access_token(&http_session).await else {
        return Redirect::to(LOGIN_PATH).into_response();
    };

    match state
        .backend()
        .subscribe(&token, PlanId::new(form.plan_id))
        .await
    {
        Ok(()) => {
            refresh_session_user(&state, &http_session, &token).await;
            let _ = session::set_flash(
                &http_session,
                Flash::success(t(prefs.lang, "subscription_started")),
            )
            .await;
        }
        Err(e) => {
            tracing::error!("Subscription failed: {e}");
            let _ = session::set_flash(
                &http_session,
                Flash::error(t(prefs.lang, "action_failed")),
            )
            .await;
        }
    }

    Redirect::to("/account").into_response()
}

/// Cancel the caller's subscription.
///
/// # Route
///
/// `POST /account/cancel`
#[instrument(skip(state, prefs, http_session))]
pub async fn cancel_subscription(
    State(state): State<AppState>,
    prefs: Prefs,
    RequireAuth(_user): RequireAuth,
    http_session: Session,
) -> Response {
    let Some(token) = session::access_token(&http_session).await else {
        return Redirect::to(LOGIN_PATH).into_response();
    };

    match state.backend().cancel_subscription(&token).await {
        Ok(()) => {
            refresh_session_user(&state, &http_session, &token).await;
            let _ = session::set_flash(
                &http_session,
                Flash::success(t(prefs.lang, "subscription_canceled")),
            )
            .await;
        }
        Err(e) => {
            tracing::error!("Subscription cancel failed: {e}");
            let _ = session::set_flash(
                &http_session,
                Flash::error(t(prefs.lang, "action_failed")),
            )
            .await;
        }
    }

    Redirect::to("/account").into_response()
}

/// Refetch the current user after a subscription mutation so the session
/// copy reflects the new state. Best-effort: the next page load retries.
async fn refresh_session_user(state: &AppState, http_session: &Session, token: &str) {
    match state.backend().current_user(token).await {
        Ok(fresh) => {
            let _ = session::set_user(http_session, &CurrentUser::from(fresh)).await;
        }
        Err(e) => tracing::warn!("Post-mutation user refresh failed: {e}"),
    }
}

/// Update the advertiser's company listing.
///
/// A validation rejection re-renders the page with the field messages
/// inline; other failures flash and leave the page as it was.
///
/// # Route
///
/// `POST /account/company`
#[instrument(skip(state, prefs, http_session, form))]
pub async fn update_company(
    State(state): State<AppState>,
    prefs: Prefs,
    RequireAuth(user): RequireAuth,
    http_session: Session,
    Form(form): Form<CompanyForm>,
) -> Response {
    let Some(token) = session::access_token(&http_session).await else {
        return Redirect::to(LOGIN_PATH).into_response();
    };
    let Some(company_id) = user.company_id else {
        let _ = session::set_flash(
            &http_session,
            Flash::error(t(prefs.lang, "action_failed")),
        )
        .await;
        return Redirect::to("/account").into_response();
    };

    match state
        .backend()
        .update_company_profile(&token, company_id, &form.into())
        .await
    {
        Ok(_) => {
            let _ = session::set_flash(
                &http_session,
                Flash::success(t(prefs.lang, "saved")),
            )
            .await;
            Redirect::to("/account").into_response()
        }
        Err(ApiError::Validation(errors)) => {
            let company_errors = errors
                .errors
                .iter()
                .flat_map(|(field, msgs)| msgs.iter().map(move |m| format!("{field}: {m}")))
                .collect();
            let company = load_company(&state, &user).await;
            account_page(prefs, &user, company.as_ref(), None, Vec::new(), company_errors)
                .into_response()
        }
        Err(e) => {
            tracing::error!("Company update failed: {e}");
            let _ = session::set_flash(
                &http_session,
                Flash::error(t(prefs.lang, "action_failed")),
            )
            .await;
            Redirect::to("/account").into_response()
        }
    }
}
