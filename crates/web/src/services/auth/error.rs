//! Federated authentication errors.

use thiserror::Error;

/// Errors that can occur when validating a federated identity token.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token failed structural or claim validation (bad audience,
    /// expired, malformed).
    #[error("invalid identity token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    /// The token carries no email claim, which the backend requires to
    /// resolve an account.
    #[error("identity token has no email claim")]
    MissingEmail,
}
