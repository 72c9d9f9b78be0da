//! Notification endpoints.
//!
//! Uncached: the notification store keeps its own per-user state and owns
//! the synchronization contract (see `stores::notifications`).

use adlist_core::NotificationId;
use reqwest::Method;
use tracing::instrument;

use super::types::Notification;
use super::{ApiError, BackendApi};

impl BackendApi {
    /// Fetch the caller's notifications, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn list_notifications(&self, token: &str) -> Result<Vec<Notification>, ApiError> {
        self.client().get("/notifications", Some(token), &[]).await
    }

    /// Mark a single notification as read.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(id = %id))]
    pub async fn mark_notification_read(
        &self,
        token: &str,
        id: NotificationId,
    ) -> Result<(), ApiError> {
        self.client()
            .send_empty(Method::POST, &format!("/notifications/{id}/read"), Some(token))
            .await
    }

    /// Mark every notification as read.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn mark_all_notifications_read(&self, token: &str) -> Result<(), ApiError> {
        self.client()
            .send_empty(Method::POST, "/notifications/read-all", Some(token))
            .await
    }

    /// Delete a notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(id = %id))]
    pub async fn delete_notification(
        &self,
        token: &str,
        id: NotificationId,
    ) -> Result<(), ApiError> {
        self.client()
            .send_empty(Method::DELETE, &format!("/notifications/{id}"), Some(token))
            .await
    }
}
