//! User administration queries and mutations (admin token required).

use adlist_core::{Role, UserId};
use reqwest::Method;
use serde::Serialize;
use tracing::{debug, instrument};

use super::cache::{CacheKey, CacheTag, CacheValue};
use super::types::{BackendUser, Paginated};
use super::{ApiError, BackendApi};

/// Payload for changing a user's role.
#[derive(Debug, Clone, Serialize)]
struct RolePayload {
    role: Role,
}

/// Payload for creating an admin account.
#[derive(Debug, Clone, Serialize)]
pub struct NewAdminPayload {
    pub name: String,
    pub email: String,
}

impl BackendApi {
    /// List platform users (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn list_users(
        &self,
        token: &str,
        page: u32,
    ) -> Result<Paginated<BackendUser>, ApiError> {
        let key = CacheKey::Users { page };
        if let Some(CacheValue::Users(users)) = self.cache().get(&key).await {
            debug!("Cache hit for users");
            return Ok(users);
        }

        let users: Paginated<BackendUser> = self
            .client()
            .get("/users", Some(token), &[("page", page.to_string())])
            .await?;

        self.cache()
            .insert(key, &[CacheTag::Users], CacheValue::Users(users.clone()))
            .await;

        Ok(users)
    }

    /// Change a user's role (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(id = %id, role = %role))]
    pub async fn update_user_role(
        &self,
        token: &str,
        id: UserId,
        role: Role,
    ) -> Result<BackendUser, ApiError> {
        let user: BackendUser = self
            .client()
            .send(
                Method::PUT,
                &format!("/users/{id}/role"),
                Some(token),
                &RolePayload { role },
            )
            .await?;

        self.cache().invalidate(&[CacheTag::Users]).await;

        Ok(user)
    }

    /// Delete a user (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(id = %id))]
    pub async fn delete_user(&self, token: &str, id: UserId) -> Result<(), ApiError> {
        self.client()
            .send_empty(Method::DELETE, &format!("/users/{id}"), Some(token))
            .await?;

        self.cache().invalidate(&[CacheTag::Users]).await;

        Ok(())
    }

    /// Create an admin account (bootstrap token required; used by the CLI).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] with field messages on invalid
    /// input, or another [`ApiError`] if the request fails.
    #[instrument(skip(self, token, payload))]
    pub async fn create_admin(
        &self,
        token: &str,
        payload: &NewAdminPayload,
    ) -> Result<BackendUser, ApiError> {
        let user: BackendUser = self
            .client()
            .send(Method::POST, "/users/admins", Some(token), payload)
            .await?;

        self.cache().invalidate(&[CacheTag::Users]).await;

        Ok(user)
    }
}
