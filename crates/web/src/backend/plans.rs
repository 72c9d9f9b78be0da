//! Subscription plan queries and subscription mutations.

use adlist_core::PlanId;
use reqwest::Method;
use serde::Serialize;
use tracing::{debug, instrument};

use super::cache::{CacheKey, CacheTag, CacheValue};
use super::types::Plan;
use super::{ApiError, BackendApi};

/// Payload for subscribing to a plan.
#[derive(Debug, Clone, Serialize)]
struct SubscribePayload {
    plan_id: PlanId,
}

impl BackendApi {
    /// List available subscription plans.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_plans(&self) -> Result<Vec<Plan>, ApiError> {
        if let Some(CacheValue::Plans(plans)) = self.cache().get(&CacheKey::Plans).await {
            debug!("Cache hit for plans");
            return Ok(plans);
        }

        let plans: Vec<Plan> = self.client().get("/plans", None, &[]).await?;

        self.cache()
            .insert(CacheKey::Plans, &[CacheTag::Plans], CacheValue::Plans(plans.clone()))
            .await;

        Ok(plans)
    }

    /// Subscribe the caller to a plan (advertiser).
    ///
    /// Dirties the profile tag: the caller's subscription state is part of
    /// the current-user payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(plan = %plan_id))]
    pub async fn subscribe(&self, token: &str, plan_id: PlanId) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .client()
            .send(
                Method::POST,
                "/subscriptions",
                Some(token),
                &SubscribePayload { plan_id },
            )
            .await?;

        self.cache().invalidate(&[CacheTag::Profile]).await;

        Ok(())
    }

    /// Cancel the caller's subscription (advertiser).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn cancel_subscription(&self, token: &str) -> Result<(), ApiError> {
        self.client()
            .send_empty(Method::DELETE, "/subscriptions/current", Some(token))
            .await?;

        self.cache().invalidate(&[CacheTag::Profile]).await;

        Ok(())
    }
}
