//! Current-user lookup and profile mutations.

use reqwest::Method;
use serde::Serialize;
use tracing::instrument;

use super::cache::CacheTag;
use super::types::BackendUser;
use super::{ApiError, BackendApi};

/// Payload for updating the caller's own profile.
#[derive(Debug, Clone, Serialize)]
pub struct ProfilePayload {
    pub name: String,
}

impl BackendApi {
    /// Fetch the user a token belongs to.
    ///
    /// Deliberately uncached: this call seeds the session after login and
    /// must observe the backend, not a stale copy.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] when the token is rejected, or
    /// another [`ApiError`] if the request fails.
    #[instrument(skip(self, token))]
    pub async fn current_user(&self, token: &str) -> Result<BackendUser, ApiError> {
        self.client().get("/users/me", Some(token), &[]).await
    }

    /// Update the caller's own profile.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] with field messages on invalid
    /// input, or another [`ApiError`] if the request fails.
    #[instrument(skip(self, token, payload))]
    pub async fn update_profile(
        &self,
        token: &str,
        payload: &ProfilePayload,
    ) -> Result<BackendUser, ApiError> {
        let user: BackendUser = self
            .client()
            .send(Method::PUT, "/users/me", Some(token), payload)
            .await?;

        self.cache().invalidate(&[CacheTag::Profile]).await;

        Ok(user)
    }
}
