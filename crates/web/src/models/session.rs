//! Session-held authentication state.
//!
//! The session is the single source of truth for "who is logged in": the
//! reactive reads (page rendering) and the imperative reads (guards) both
//! go through it, and the Postgres-backed store is a write-through
//! persistence sink behind it. Token and user live under fixed keys and
//! are only ever mutated through the helpers here.

use adlist_core::{CompanyId, Email, Role, SubscriptionStatus, UserId};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::backend::types::BackendUser;

/// Session keys for authentication and UI state.
pub mod session_keys {
    /// Key for the opaque backend access token.
    pub const ACCESS_TOKEN: &str = "access_token";

    /// Key for the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the one-shot flash message.
    pub const FLASH: &str = "flash";
}

/// Session-stored user identity.
///
/// The subset of the backend user the front end needs between requests;
/// refreshed whenever the profile is refetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's backend ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: Email,
    /// Role used for rendering decisions and redirects.
    pub role: Role,
    /// Subscription state shown in the account area.
    pub subscription: SubscriptionStatus,
    /// The company listing this advertiser manages, when they have one.
    pub company_id: Option<CompanyId>,
}

impl From<BackendUser> for CurrentUser {
    fn from(user: BackendUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            subscription: user.subscription,
            company_id: user.company_id,
        }
    }
}

/// Severity of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

impl FlashKind {
    /// CSS class suffix used by the base template.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// One-shot message shown on the next rendered page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    /// A success flash.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    /// An error flash.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }
}

/// Store the backend access token.
///
/// No validation is performed here; the token is opaque to the front end.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_token(
    session: &Session,
    token: &str,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::ACCESS_TOKEN, token).await
}

/// Read the backend access token.
pub async fn access_token(session: &Session) -> Option<String> {
    session
        .get(session_keys::ACCESS_TOKEN)
        .await
        .ok()
        .flatten()
}

/// Store the current user.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Read the current user.
pub async fn current_user(session: &Session) -> Option<CurrentUser> {
    session
        .get(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
}

/// Sign out: drop token, user, and every other piece of session state in
/// one step, including the persisted row.
///
/// # Errors
///
/// Returns an error if the session store cannot be modified.
pub async fn sign_out(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

/// Queue a flash message for the next rendered page.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_flash(
    session: &Session,
    flash: Flash,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::FLASH, &flash).await
}

/// Take the pending flash message, clearing it.
pub async fn take_flash(session: &Session) -> Option<Flash> {
    session
        .remove::<Flash>(session_keys::FLASH)
        .await
        .ok()
        .flatten()
}
