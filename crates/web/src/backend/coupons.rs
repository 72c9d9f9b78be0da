//! Coupon queries and mutations (admin-managed).

use adlist_core::{CompanyId, CouponId};
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::Serialize;
use tracing::{debug, instrument};

use super::cache::{CacheKey, CacheTag, CacheValue};
use super::types::{Coupon, Paginated};
use super::{ApiError, BackendApi};

/// Payload for creating or updating a coupon.
#[derive(Debug, Clone, Serialize)]
pub struct CouponPayload {
    pub company_id: CompanyId,
    pub code: String,
    pub description: Option<String>,
    pub discount_percent: Option<u8>,
    pub expires_at: Option<DateTime<Utc>>,
    pub active: bool,
}

impl BackendApi {
    /// List coupons (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn list_coupons(&self, token: &str, page: u32) -> Result<Paginated<Coupon>, ApiError> {
        let key = CacheKey::Coupons { page };
        if let Some(CacheValue::Coupons(coupons)) = self.cache().get(&key).await {
            debug!("Cache hit for coupons");
            return Ok(coupons);
        }

        let coupons: Paginated<Coupon> = self
            .client()
            .get("/coupons", Some(token), &[("page", page.to_string())])
            .await?;

        self.cache()
            .insert(key, &[CacheTag::Coupons], CacheValue::Coupons(coupons.clone()))
            .await;

        Ok(coupons)
    }

    /// Coupons currently active for a company (public company pages).
    ///
    /// Served uncached: coupon codes are redeemed against the backend and a
    /// stale "active" flag misleads visitors.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(company = %company_id))]
    pub async fn company_coupons(&self, company_id: CompanyId) -> Result<Vec<Coupon>, ApiError> {
        self.client()
            .get(&format!("/companies/{company_id}/coupons"), None, &[])
            .await
    }

    /// Create a coupon (admin).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] with field messages on invalid
    /// input, or another [`ApiError`] if the request fails.
    #[instrument(skip(self, token, payload))]
    pub async fn create_coupon(
        &self,
        token: &str,
        payload: &CouponPayload,
    ) -> Result<Coupon, ApiError> {
        let coupon: Coupon = self
            .client()
            .send(Method::POST, "/coupons", Some(token), payload)
            .await?;

        self.cache().invalidate(&[CacheTag::Coupons]).await;

        Ok(coupon)
    }

    /// Update a coupon (admin).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] with field messages on invalid
    /// input, or another [`ApiError`] if the request fails.
    #[instrument(skip(self, token, payload), fields(id = %id))]
    pub async fn update_coupon(
        &self,
        token: &str,
        id: CouponId,
        payload: &CouponPayload,
    ) -> Result<Coupon, ApiError> {
        let coupon: Coupon = self
            .client()
            .send(Method::PUT, &format!("/coupons/{id}"), Some(token), payload)
            .await?;

        self.cache()
            .invalidate(&[CacheTag::Coupons, CacheTag::Coupon(id)])
            .await;

        Ok(coupon)
    }

    /// Delete a coupon (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(id = %id))]
    pub async fn delete_coupon(&self, token: &str, id: CouponId) -> Result<(), ApiError> {
        self.client()
            .send_empty(Method::DELETE, &format!("/coupons/{id}"), Some(token))
            .await?;

        self.cache()
            .invalidate(&[CacheTag::Coupons, CacheTag::Coupon(id)])
            .await;

        Ok(())
    }
}
