//! Authentication route handlers.
//!
//! Login is delegated to an external identity flow: the provider redirects
//! back to `/auth/callback` carrying the result in query parameters
//! (`token` on success, `error` on failure). The callback persists the
//! token, resolves the identity it names through the backend, and lands
//! the user by role.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::filters;
use crate::backend::BackendApi;
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::i18n::{Lang, t};
use crate::middleware::auth::{LOGIN_PATH, OptionalAuth};
use crate::middleware::prefs::Prefs;
use crate::models::{CurrentUser, Flash, session};
use crate::services::auth::validate_federated_token;
use crate::state::AppState;

// =============================================================================
// Query & Form Types
// =============================================================================

/// Query parameters delivered by the external identity flow.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    /// Platform token issued for the signed-in identity.
    pub token: Option<String>,
    /// Error code when the provider flow failed.
    pub error: Option<String>,
}

/// Form posted by the federated sign-in widget.
#[derive(Debug, Deserialize)]
pub struct FederatedForm {
    /// Provider-issued ID token.
    pub credential: String,
}

/// Backend response to a federated claim exchange.
#[derive(Debug, Deserialize)]
struct FederatedExchange {
    token: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub chrome: super::PageChrome,
}

/// Signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/signup.html")]
pub struct SignupTemplate {
    pub chrome: super::PageChrome,
}

/// Forgot-password page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/forgot_password.html")]
pub struct ForgotPasswordTemplate {
    pub chrome: super::PageChrome,
}

// =============================================================================
// Page Handlers
// =============================================================================

/// Display the login page.
///
/// # Route
///
/// `GET /auth/login` (signed-in users are redirected home by middleware)
pub async fn login_page(prefs: Prefs, session: Session) -> LoginTemplate {
    let flash = session::take_flash(&session).await;
    LoginTemplate {
        chrome: super::PageChrome::new(prefs, None, flash),
    }
}

/// Display the signup page.
///
/// # Route
///
/// `GET /auth/signup`
pub async fn signup_page(prefs: Prefs, session: Session) -> SignupTemplate {
    let flash = session::take_flash(&session).await;
    SignupTemplate {
        chrome: super::PageChrome::new(prefs, None, flash),
    }
}

/// Display the forgot-password page.
///
/// # Route
///
/// `GET /auth/forgot-password`
pub async fn forgot_password_page(prefs: Prefs, session: Session) -> ForgotPasswordTemplate {
    let flash = session::take_flash(&session).await;
    ForgotPasswordTemplate {
        chrome: super::PageChrome::new(prefs, None, flash),
    }
}

// =============================================================================
// Login Completion (external-token handoff)
// =============================================================================

/// Complete a login delivered via query parameters.
///
/// # Route
///
/// `GET /auth/callback?token=…` or `GET /auth/callback?error=…`
pub async fn callback(
    State(state): State<AppState>,
    prefs: Prefs,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Redirect {
    complete_login(state.backend(), &session, query, prefs.lang).await
}

/// The handoff flow proper, separated from the axum plumbing.
///
/// - `error` present: flash a failure and return to login without touching
///   the backend.
/// - `token` present: persist it, then resolve the identity it names. On
///   success, persist the user and land by role; on any failure, flash and
///   return to login. The already-persisted token is NOT rolled back -
///   behavior kept from the system this mirrors, pending product
///   clarification.
/// - neither: flash "no token found" and return to login.
pub(crate) async fn complete_login(
    backend: &BackendApi,
    session: &Session,
    query: CallbackQuery,
    lang: Lang,
) -> Redirect {
    if let Some(error) = query.error {
        tracing::warn!(provider_error = %error, "External login flow failed");
        let _ = session::set_flash(session, Flash::error(t(lang, "login_failed"))).await;
        return Redirect::to(LOGIN_PATH);
    }

    let Some(token) = query.token else {
        tracing::warn!("Login callback carried neither token nor error");
        let _ = session::set_flash(session, Flash::error(t(lang, "login_no_token"))).await;
        return Redirect::to(LOGIN_PATH);
    };

    if let Err(e) = session::set_token(session, &token).await {
        tracing::error!("Failed to store access token in session: {e}");
        let _ = session::set_flash(session, Flash::error(t(lang, "login_failed"))).await;
        return Redirect::to(LOGIN_PATH);
    }

    match backend.current_user(&token).await {
        Ok(user) => {
            let user = CurrentUser::from(user);
            if let Err(e) = session::set_user(session, &user).await {
                tracing::error!("Failed to store user in session: {e}");
                let _ = session::set_flash(session, Flash::error(t(lang, "login_failed"))).await;
                return Redirect::to(LOGIN_PATH);
            }

            set_sentry_user(&user.id, Some(user.email.as_str()));
            tracing::info!(user = %user.id, role = %user.role, "User signed in");

            let _ = session::set_flash(session, Flash::success(t(lang, "login_success"))).await;
            if user.role.is_admin() {
                Redirect::to("/admin")
            } else {
                Redirect::to("/account")
            }
        }
        Err(e) => {
            tracing::error!("Failed to resolve identity for login token: {e}");
            let _ = session::set_flash(session, Flash::error(t(lang, "login_failed"))).await;
            Redirect::to(LOGIN_PATH)
        }
    }
}

// =============================================================================
// Federated Exchange
// =============================================================================

/// Validate a federated ID token and exchange it for a platform token.
///
/// The audience and expiry are checked here against the configured client
/// ID; the backend re-verifies the signature, resolves or creates the
/// account, and answers with a platform token that is then fed through the
/// normal callback flow.
///
/// # Route
///
/// `POST /auth/federated`
pub async fn federated(
    State(state): State<AppState>,
    Form(form): Form<FederatedForm>,
) -> Redirect {
    let claims = match validate_federated_token(&form.credential, &state.config().oauth_client_id)
    {
        Ok(claims) => claims,
        Err(e) => {
            tracing::warn!("Rejected federated identity token: {e}");
            return Redirect::to("/auth/callback?error=invalid_token");
        }
    };

    let exchange: Result<FederatedExchange, _> = state
        .backend()
        .client()
        .send(reqwest::Method::POST, "/auth/federated", None, &claims)
        .await;

    match exchange {
        Ok(exchange) => {
            let target = format!(
                "/auth/callback?token={}",
                urlencoding::encode(&exchange.token)
            );
            Redirect::to(&target)
        }
        Err(e) => {
            tracing::error!("Federated claim exchange failed: {e}");
            Redirect::to("/auth/callback?error=exchange_failed")
        }
    }
}

// =============================================================================
// Logout & Role Landing
// =============================================================================

/// Sign out.
///
/// Flushes the whole session (token, user, everything) and drops the
/// user's notification state so nothing stale survives the next sign-in.
///
/// # Route
///
/// `POST /auth/logout`
pub async fn logout(
    State(state): State<AppState>,
    prefs: Prefs,
    session: Session,
) -> Response {
    if let Some(user) = session::current_user(&session).await {
        state.notifications().clear(user.id);
        tracing::info!(user = %user.id, "User signed out");
    }

    if let Err(e) = session::sign_out(&session).await {
        tracing::error!("Failed to flush session on logout: {e}");
    }
    clear_sentry_user();

    let _ = session::set_flash(&session, Flash::success(t(prefs.lang, "signed_out"))).await;
    Redirect::to("/").into_response()
}

/// Post-login landing decision.
///
/// # Route
///
/// `GET /dashboard` - admin → `/admin`, signed-in non-admin → `/account`,
/// absent → login.
pub async fn dashboard(OptionalAuth(user): OptionalAuth) -> Redirect {
    match user {
        Some(user) if user.role.is_admin() => Redirect::to("/admin"),
        Some(_) => Redirect::to("/account"),
        None => Redirect::to(LOGIN_PATH),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::http::header::LOCATION;
    use tower_sessions::{MemoryStore, Session};

    use super::*;
    use crate::config::BackendConfig;
    use crate::models::session::{access_token, take_flash};

    /// Backend client pointed at a dead port: any call fails at the
    /// transport layer.
    fn dead_backend() -> BackendApi {
        BackendApi::new(&BackendConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
        })
    }

    fn memory_session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    fn location_of(redirect: Redirect) -> String {
        let response = redirect.into_response();
        response
            .headers()
            .get(LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_callback_with_error_redirects_to_login() {
        // The error branch returns before any backend access; the dead
        // backend would fail loudly if a call were attempted.
        let session = memory_session();
        let redirect = complete_login(
            &dead_backend(),
            &session,
            CallbackQuery {
                token: None,
                error: Some("access_denied".to_string()),
            },
            Lang::En,
        )
        .await;

        assert_eq!(location_of(redirect), LOGIN_PATH);
        let flash = take_flash(&session).await.unwrap();
        assert_eq!(flash.message, t(Lang::En, "login_failed"));
        assert!(access_token(&session).await.is_none());
    }

    #[tokio::test]
    async fn test_callback_without_params_flags_missing_token() {
        let session = memory_session();
        let redirect = complete_login(
            &dead_backend(),
            &session,
            CallbackQuery {
                token: None,
                error: None,
            },
            Lang::En,
        )
        .await;

        assert_eq!(location_of(redirect), LOGIN_PATH);
        let flash = take_flash(&session).await.unwrap();
        assert_eq!(flash.message, t(Lang::En, "login_no_token"));
    }

    #[tokio::test]
    async fn test_callback_failed_identity_lookup_keeps_token() {
        // The token is written before the identity fetch; a failed fetch
        // redirects to login but does NOT roll the token back.
        let session = memory_session();
        let redirect = complete_login(
            &dead_backend(),
            &session,
            CallbackQuery {
                token: Some("tok-abc".to_string()),
                error: None,
            },
            Lang::En,
        )
        .await;

        assert_eq!(location_of(redirect), LOGIN_PATH);
        assert_eq!(access_token(&session).await.as_deref(), Some("tok-abc"));
        let flash = take_flash(&session).await.unwrap();
        assert_eq!(flash.message, t(Lang::En, "login_failed"));
        // The user was never resolved
        assert!(session::current_user(&session).await.is_none());
    }

    #[tokio::test]
    async fn test_callback_error_wins_over_token() {
        // Both parameters present: the error branch runs first and no
        // token is persisted.
        let session = memory_session();
        let redirect = complete_login(
            &dead_backend(),
            &session,
            CallbackQuery {
                token: Some("tok-abc".to_string()),
                error: Some("access_denied".to_string()),
            },
            Lang::En,
        )
        .await;

        assert_eq!(location_of(redirect), LOGIN_PATH);
        assert!(access_token(&session).await.is_none());
    }

    #[tokio::test]
    async fn test_dashboard_landing_by_role() {
        use adlist_core::{Email, Role, SubscriptionStatus, UserId};

        let admin = CurrentUser {
            id: UserId::new(1),
            name: "Root".to_string(),
            email: Email::parse("root@example.com").unwrap(),
            role: Role::Admin,
            subscription: SubscriptionStatus::None,
            company_id: None,
        };
        let advertiser = CurrentUser {
            role: Role::Advertiser,
            ..admin.clone()
        };

        assert_eq!(
            location_of(dashboard(OptionalAuth(Some(admin))).await),
            "/admin"
        );
        assert_eq!(
            location_of(dashboard(OptionalAuth(Some(advertiser))).await),
            "/account"
        );
        assert_eq!(location_of(dashboard(OptionalAuth(None)).await), LOGIN_PATH);
    }
}
