//! Backend API client.
//!
//! # Architecture
//!
//! - The backend service owns every business entity - NO local sync, direct
//!   API calls over JSON REST
//! - Bearer-token convention: `Authorization: Bearer <token>` on every
//!   authenticated call, token sourced from the caller's session
//! - In-memory caching via `moka` for read responses (5 minute TTL), with
//!   tag-based invalidation: a mutation declares the tags it dirties and
//!   every cached read registered under those tags is dropped
//! - No retry policy anywhere: a single failure is terminal for that
//!   attempt, the caller decides how to surface it
//!
//! # Example
//!
//! ```rust,ignore
//! use adlist_web::backend::BackendApi;
//!
//! let api = BackendApi::new(&config.backend);
//!
//! // Cached read
//! let categories = api.list_categories().await?;
//!
//! // Mutation - invalidates the Categories tag
//! api.create_category(token, &payload).await?;
//! ```

pub mod analytics;
pub mod cache;
pub mod categories;
mod client;
pub mod companies;
pub mod coupons;
pub mod notifications;
pub mod plans;
pub mod profile;
pub mod types;
pub mod users;

use std::sync::Arc;

use thiserror::Error;

use crate::config::BackendConfig;
pub use cache::{CacheKey, CacheTag, CacheValue, ResponseCache};
pub use client::BackendClient;
pub use types::*;

/// Field-level validation messages from a backend mutation.
///
/// The backend answers invalid mutations with
/// `{"errors": {"field": ["message", …]}}`; the map is preserved so forms
/// can re-render each message next to its field.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ValidationErrors {
    /// Messages keyed by field name.
    pub errors: std::collections::BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    /// Messages for a single field, empty when the field is clean.
    #[must_use]
    pub fn field(&self, name: &str) -> &[String] {
        self.errors.get(name).map_or(&[], Vec::as_slice)
    }

    /// Flatten to one human-readable line per field.
    #[must_use]
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|(field, msgs)| format!("{field}: {}", msgs.join(", ")))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Errors that can occur when calling the backend API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status without a more specific mapping.
    #[error("Backend returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body, or a truncated body.
        message: String,
    },

    /// Backend rejected the mutation with field-level messages (422).
    #[error("Validation failed: {}", .0.summary())]
    Validation(ValidationErrors),

    /// Token missing, expired, or rejected (401).
    #[error("Not authenticated")]
    Unauthorized,

    /// Resource not found (404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Client for the Adlist backend API.
///
/// Cheaply cloneable; wraps the HTTP client and the tag-aware response
/// cache shared by every resource module.
#[derive(Clone)]
pub struct BackendApi {
    inner: Arc<BackendApiInner>,
}

struct BackendApiInner {
    client: BackendClient,
    cache: ResponseCache,
}

impl BackendApi {
    /// Create a new backend API client.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            inner: Arc::new(BackendApiInner {
                client: BackendClient::new(config),
                cache: ResponseCache::new(),
            }),
        }
    }

    /// Check backend reachability (readiness probe).
    ///
    /// # Errors
    ///
    /// Returns an error when the backend's health endpoint is unreachable
    /// or unhealthy.
    pub async fn health(&self) -> Result<(), ApiError> {
        let _: serde_json::Value = self.inner.client.get("/health", None, &[]).await?;
        Ok(())
    }

    /// The underlying HTTP client.
    pub(crate) fn client(&self) -> &BackendClient {
        &self.inner.client
    }

    /// The shared response cache.
    pub(crate) fn cache(&self) -> &ResponseCache {
        &self.inner.cache
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("company 12".to_string());
        assert_eq!(err.to_string(), "Not found: company 12");

        let err = ApiError::Status {
            status: 503,
            message: "maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "Backend returned 503: maintenance");
    }

    #[test]
    fn test_validation_errors_field_lookup() {
        let errors: ValidationErrors =
            serde_json::from_str(r#"{"errors":{"name":["is required"],"slug":["is taken","too short"]}}"#)
                .unwrap();

        assert_eq!(errors.field("name"), ["is required"]);
        assert_eq!(errors.field("slug").len(), 2);
        assert!(errors.field("missing").is_empty());
    }

    #[test]
    fn test_validation_errors_summary() {
        let errors: ValidationErrors =
            serde_json::from_str(r#"{"errors":{"code":["is taken"]}}"#).unwrap();
        let err = ApiError::Validation(errors);
        assert_eq!(err.to_string(), "Validation failed: code: is taken");
    }
}
