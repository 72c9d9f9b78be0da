//! Admin account management commands.
//!
//! # Usage
//!
//! ```bash
//! adlist-cli admin create -e admin@example.com -n "Admin Name"
//! ```
//!
//! # Environment Variables
//!
//! - `ADLIST_BACKEND_URL` - Base URL of the backend API
//! - `ADLIST_ADMIN_TOKEN` - Bootstrap bearer token authorized to create admins

use adlist_core::Email;
use adlist_web::backend::users::NewAdminPayload;
use adlist_web::backend::{ApiError, BackendApi};
use adlist_web::config::BackendConfig;
use thiserror::Error;

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Backend call failed.
    #[error("Backend error: {0}")]
    Api(#[from] ApiError),
}

/// Create a new admin account through the backend API.
///
/// # Arguments
///
/// * `email` - Admin's email address
/// * `name` - Admin's display name
///
/// # Returns
///
/// The backend-issued ID of the created admin.
///
/// # Errors
///
/// Returns [`AdminError`] when configuration is missing, the email is
/// invalid, or the backend rejects the request.
pub async fn create_admin(email: &str, name: &str) -> Result<i64, AdminError> {
    dotenvy::dotenv().ok();

    let email = Email::parse(email).map_err(|e| AdminError::InvalidEmail(e.to_string()))?;

    let backend_url = std::env::var("ADLIST_BACKEND_URL")
        .map_err(|_| AdminError::MissingEnvVar("ADLIST_BACKEND_URL"))?;
    let token = std::env::var("ADLIST_ADMIN_TOKEN")
        .map_err(|_| AdminError::MissingEnvVar("ADLIST_ADMIN_TOKEN"))?;

    let api = BackendApi::new(&BackendConfig {
        base_url: backend_url.trim_end_matches('/').to_string(),
        timeout_secs: 10,
    });

    tracing::info!("Creating admin account: {} <{}>", name, email);
    let user = api
        .create_admin(
            &token,
            &NewAdminPayload {
                name: name.to_owned(),
                email: email.into_inner(),
            },
        )
        .await?;

    tracing::info!("Created admin {} ({})", user.email, user.id);
    Ok(user.id.as_i64())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_admin_rejects_bad_email() {
        let result = create_admin("not-an-email", "Name").await;
        assert!(matches!(result, Err(AdminError::InvalidEmail(_))));
    }
}
