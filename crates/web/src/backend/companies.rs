//! Company listing queries and profile mutations.

use adlist_core::{CategoryId, CompanyId};
use reqwest::Method;
use serde::Serialize;
use tracing::{debug, instrument};

use super::cache::{CacheKey, CacheTag, CacheValue};
use super::types::{Company, Paginated};
use super::{ApiError, BackendApi};

/// Payload for updating a company profile (advertiser-owned fields).
#[derive(Debug, Clone, Serialize)]
pub struct CompanyProfilePayload {
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
}

impl BackendApi {
    /// List companies, optionally filtered by category.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_companies(
        &self,
        category: Option<CategoryId>,
        page: u32,
    ) -> Result<Paginated<Company>, ApiError> {
        let key = CacheKey::Companies { category, page };
        if let Some(CacheValue::Companies(companies)) = self.cache().get(&key).await {
            debug!("Cache hit for companies");
            return Ok(companies);
        }

        let mut query = vec![("page", page.to_string())];
        if let Some(category) = category {
            query.push(("category_id", category.to_string()));
        }

        let companies: Paginated<Company> =
            self.client().get("/companies", None, &query).await?;

        let mut tags = vec![CacheTag::Companies];
        if let Some(category) = category {
            tags.push(CacheTag::Category(category));
        }
        self.cache()
            .insert(key, &tags, CacheValue::Companies(companies.clone()))
            .await;

        Ok(companies)
    }

    /// Get a single company.
    ///
    /// # Errors
    ///
    /// Returns an error if the company is not found or the request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_company(&self, id: CompanyId) -> Result<Company, ApiError> {
        let key = CacheKey::Company(id);
        if let Some(CacheValue::Company(company)) = self.cache().get(&key).await {
            debug!("Cache hit for company");
            return Ok(*company);
        }

        let company: Company = self
            .client()
            .get(&format!("/companies/{id}"), None, &[])
            .await?;

        self.cache()
            .insert(
                key,
                &[CacheTag::Companies, CacheTag::Company(id)],
                CacheValue::Company(Box::new(company.clone())),
            )
            .await;

        Ok(company)
    }

    /// Update the caller's company profile (advertiser).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] with field messages on invalid
    /// input, or another [`ApiError`] if the request fails.
    #[instrument(skip(self, token, payload), fields(id = %id))]
    pub async fn update_company_profile(
        &self,
        token: &str,
        id: CompanyId,
        payload: &CompanyProfilePayload,
    ) -> Result<Company, ApiError> {
        let company: Company = self
            .client()
            .send(Method::PUT, &format!("/companies/{id}"), Some(token), payload)
            .await?;

        self.cache()
            .invalidate(&[
                CacheTag::Companies,
                CacheTag::Company(id),
                CacheTag::Profile,
            ])
            .await;

        Ok(company)
    }
}
