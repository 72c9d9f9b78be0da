//! Category queries and mutations.
//!
//! Reads are cached under [`CacheTag::Categories`] / [`CacheTag::Category`];
//! mutations also dirty [`CacheTag::Companies`] because category renames
//! change the listings rendered under each company.

use adlist_core::CategoryId;
use reqwest::Method;
use serde::Serialize;
use tracing::{debug, instrument};

use super::cache::{CacheKey, CacheTag, CacheValue};
use super::types::Category;
use super::{ApiError, BackendApi};

/// Payload for creating or updating a category.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryPayload {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

impl BackendApi {
    /// List all categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        if let Some(CacheValue::Categories(categories)) =
            self.cache().get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let categories: Vec<Category> = self.client().get("/categories", None, &[]).await?;

        self.cache()
            .insert(
                CacheKey::Categories,
                &[CacheTag::Categories],
                CacheValue::Categories(categories.clone()),
            )
            .await;

        Ok(categories)
    }

    /// Get a single category.
    ///
    /// # Errors
    ///
    /// Returns an error if the category is not found or the request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_category(&self, id: CategoryId) -> Result<Category, ApiError> {
        let key = CacheKey::Category(id);
        if let Some(CacheValue::Category(category)) = self.cache().get(&key).await {
            debug!("Cache hit for category");
            return Ok(*category);
        }

        let category: Category = self
            .client()
            .get(&format!("/categories/{id}"), None, &[])
            .await?;

        self.cache()
            .insert(
                key,
                &[CacheTag::Categories, CacheTag::Category(id)],
                CacheValue::Category(Box::new(category.clone())),
            )
            .await;

        Ok(category)
    }

    /// Create a category (admin).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] with field messages on invalid
    /// input, or another [`ApiError`] if the request fails.
    #[instrument(skip(self, token, payload))]
    pub async fn create_category(
        &self,
        token: &str,
        payload: &CategoryPayload,
    ) -> Result<Category, ApiError> {
        let category: Category = self
            .client()
            .send(Method::POST, "/categories", Some(token), payload)
            .await?;

        self.cache()
            .invalidate(&[CacheTag::Categories, CacheTag::Companies])
            .await;

        Ok(category)
    }

    /// Update a category (admin).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] with field messages on invalid
    /// input, or another [`ApiError`] if the request fails.
    #[instrument(skip(self, token, payload), fields(id = %id))]
    pub async fn update_category(
        &self,
        token: &str,
        id: CategoryId,
        payload: &CategoryPayload,
    ) -> Result<Category, ApiError> {
        let category: Category = self
            .client()
            .send(Method::PUT, &format!("/categories/{id}"), Some(token), payload)
            .await?;

        self.cache()
            .invalidate(&[
                CacheTag::Categories,
                CacheTag::Category(id),
                CacheTag::Companies,
            ])
            .await;

        Ok(category)
    }

    /// Delete a category (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(id = %id))]
    pub async fn delete_category(&self, token: &str, id: CategoryId) -> Result<(), ApiError> {
        self.client()
            .send_empty(Method::DELETE, &format!("/categories/{id}"), Some(token))
            .await?;

        self.cache()
            .invalidate(&[
                CacheTag::Categories,
                CacheTag::Category(id),
                CacheTag::Companies,
            ])
            .await;

        Ok(())
    }
}
