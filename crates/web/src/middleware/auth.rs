//! Route guards.
//!
//! Rendering gates only: a guard controls whether a subtree of the site is
//! rendered for this session, never whether the backend accepts a call.
//! The backend re-checks authorization on every request it receives.

use axum::{
    extract::{FromRequestParts, Request},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentUser, session_keys};

/// Default redirect target for rejected page requests.
pub const LOGIN_PATH: &str = "/auth/login";

/// Extractor that requires a signed-in user.
///
/// If no user is in the session, page requests are redirected to the login
/// page and `/api/` requests get 401.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Error returned when authentication is required but absent.
pub enum AuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::Unauthorized)?;

        // Get the current user from the session
        let user: CurrentUser = session
            .get(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
            .ok_or_else(|| {
                if is_api_request(parts) {
                    AuthRejection::Unauthorized
                } else {
                    AuthRejection::RedirectToLogin
                }
            })?;

        Ok(Self(user))
    }
}

/// Extractor that requires a signed-in admin.
///
/// A missing user rejects like [`RequireAuth`]; a signed-in user whose role
/// is not admin is rejected regardless of anything else.
pub struct RequireAdmin(pub CurrentUser);

/// Error returned when admin access is required.
pub enum AdminRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
    /// Forbidden - signed in but not an admin.
    Forbidden,
}

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Forbidden => {
                (StatusCode::FORBIDDEN, "Only admins can access this resource").into_response()
            }
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AdminRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AdminRejection::Unauthorized)?;

        let user: CurrentUser = session
            .get(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
            .ok_or_else(|| {
                if is_api_request(parts) {
                    AdminRejection::Unauthorized
                } else {
                    AdminRejection::RedirectToLogin
                }
            })?;

        if !user.role.is_admin() {
            return Err(if is_api_request(parts) {
                AdminRejection::Forbidden
            } else {
                AdminRejection::RedirectToLogin
            });
        }

        Ok(Self(user))
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this never rejects.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(
///     OptionalAuth(user): OptionalAuth,
/// ) -> impl IntoResponse {
///     match user {
///         Some(u) => format!("Hello, {}!", u.name),
///         None => "Hello, guest!".to_string(),
///     }
/// }
/// ```
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentUser>(session_keys::CURRENT_USER)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(user))
    }
}

/// Middleware for the auth-only pages (login, signup, forgot-password):
/// a signed-in user has no business re-visiting them and is sent home.
pub async fn redirect_authenticated(
    session: Session,
    request: Request,
    next: Next,
) -> Response {
    let signed_in = session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
        .is_some();

    if signed_in {
        return Redirect::to("/").into_response();
    }

    next.run(request).await
}

/// Whether the request targets the JSON API rather than a page.
fn is_api_request(parts: &Parts) -> bool {
    parts.uri.path().starts_with("/api/")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use adlist_core::{Email, Role, SubscriptionStatus, UserId};
    use axum::http::Request;
    use tower_sessions::{MemoryStore, Session};

    use super::*;

    fn user_with_role(role: Role) -> CurrentUser {
        CurrentUser {
            id: UserId::new(1),
            name: "Dana".to_string(),
            email: Email::parse("dana@example.com").unwrap(),
            role,
            subscription: SubscriptionStatus::Active,
            company_id: None,
        }
    }

    async fn session_with(user: Option<&CurrentUser>) -> Session {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        if let Some(user) = user {
            session
                .insert(session_keys::CURRENT_USER, user)
                .await
                .unwrap();
        }
        session
    }

    fn parts_for(uri: &str, session: Session) -> Parts {
        let (mut parts, ()) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        parts.extensions.insert(session);
        parts
    }

    #[tokio::test]
    async fn test_require_auth_redirects_without_user() {
        let mut parts = parts_for("/account", session_with(None).await);
        let result = RequireAuth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthRejection::RedirectToLogin)));
    }

    #[tokio::test]
    async fn test_require_auth_unauthorized_for_api() {
        let mut parts = parts_for("/api/notifications", session_with(None).await);
        let result = RequireAuth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthRejection::Unauthorized)));
    }

    #[tokio::test]
    async fn test_require_auth_passes_with_user() {
        let user = user_with_role(Role::Advertiser);
        let mut parts = parts_for("/account", session_with(Some(&user)).await);
        let result = RequireAuth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Ok(RequireAuth(u)) if u.id == user.id));
    }

    #[tokio::test]
    async fn test_require_admin_rejects_advertiser() {
        // Authenticated but not admin: rejected all the same
        let user = user_with_role(Role::Advertiser);
        let mut parts = parts_for("/admin", session_with(Some(&user)).await);
        let result = RequireAdmin::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AdminRejection::RedirectToLogin)));
    }

    #[tokio::test]
    async fn test_require_admin_forbidden_for_api() {
        let user = user_with_role(Role::Visitor);
        let mut parts = parts_for("/api/admin/users", session_with(Some(&user)).await);
        let result = RequireAdmin::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AdminRejection::Forbidden)));
    }

    #[tokio::test]
    async fn test_require_admin_redirects_without_user() {
        let mut parts = parts_for("/admin", session_with(None).await);
        let result = RequireAdmin::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AdminRejection::RedirectToLogin)));
    }

    #[tokio::test]
    async fn test_require_admin_passes_admin() {
        let user = user_with_role(Role::Admin);
        let mut parts = parts_for("/admin", session_with(Some(&user)).await);
        let result = RequireAdmin::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Ok(RequireAdmin(u)) if u.role.is_admin()));
    }

    #[tokio::test]
    async fn test_optional_auth_never_rejects() {
        let mut parts = parts_for("/", session_with(None).await);
        let OptionalAuth(user) = OptionalAuth::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(user.is_none());
    }

    #[tokio::test]
    async fn test_sign_out_clears_token_and_user() {
        use crate::models::session;

        let s = session_with(None).await;
        session::set_token(&s, "tok-123").await.unwrap();
        session::set_user(&s, &user_with_role(Role::Admin)).await.unwrap();
        assert!(session::access_token(&s).await.is_some());

        session::sign_out(&s).await.unwrap();

        assert!(session::access_token(&s).await.is_none());
        assert!(session::current_user(&s).await.is_none());
    }
}
