//! HTTP transport for the backend API.
//!
//! Wraps `reqwest` to inject bearer tokens and normalize error shapes so
//! the resource modules only ever see [`ApiError`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{ApiError, ValidationErrors};
use crate::config::BackendConfig;

/// Envelope the backend uses for plain error messages.
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    message: String,
}

/// Low-level backend HTTP client.
///
/// Builds requests against the configured base URL, attaches the
/// `Authorization: Bearer` header when a token is supplied, and maps
/// responses onto the normalized error taxonomy.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Create a new client from configuration.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            inner: Arc::new(BackendClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        }
    }

    /// GET a JSON resource.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-success status, or
    /// body decode failure.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let mut request = self
            .inner
            .client
            .get(format!("{}{path}", self.inner.base_url));
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        Self::decode(path, response).await
    }

    /// Send a JSON body and decode a JSON response.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-success status, or
    /// body decode failure.
    pub async fn send<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> Result<T, ApiError> {
        let mut request = self
            .inner
            .client
            .request(method, format!("{}{path}", self.inner.base_url))
            .json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        Self::decode(path, response).await
    }

    /// Send a request without a body, discarding any response payload.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or non-success status.
    pub async fn send_empty(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
    ) -> Result<(), ApiError> {
        let mut request = self
            .inner
            .client
            .request(method, format!("{}{path}", self.inner.base_url));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        Err(Self::normalize_failure(path, status, &response.text().await.unwrap_or_default()))
    }

    /// Decode a response, normalizing failures.
    async fn decode<T: DeserializeOwned>(
        path: &str,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();

        // Read body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Self::normalize_failure(path, status, &body));
        }

        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    path = %path,
                    error = %e,
                    body = %body.chars().take(500).collect::<String>(),
                    "Failed to parse backend response"
                );
                Err(ApiError::Parse(e))
            }
        }
    }

    /// Map a non-success status + body to the error taxonomy.
    fn normalize_failure(path: &str, status: StatusCode, body: &str) -> ApiError {
        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
            StatusCode::NOT_FOUND => ApiError::NotFound(path.to_string()),
            StatusCode::UNPROCESSABLE_ENTITY => {
                match serde_json::from_str::<ValidationErrors>(body) {
                    Ok(errors) => ApiError::Validation(errors),
                    // 422 without the expected shape degrades to a plain status error
                    Err(_) => ApiError::Status {
                        status: status.as_u16(),
                        message: extract_message(body),
                    },
                }
            }
            _ => {
                tracing::error!(
                    path = %path,
                    status = %status,
                    body = %body.chars().take(500).collect::<String>(),
                    "Backend returned non-success status"
                );
                ApiError::Status {
                    status: status.as_u16(),
                    message: extract_message(body),
                }
            }
        }
    }
}

/// Pull a `{"message": …}` out of an error body, falling back to the
/// truncated raw body.
fn extract_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body).map_or_else(
        |_| body.chars().take(200).collect::<String>(),
        |parsed| parsed.message,
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_message_envelope() {
        assert_eq!(
            extract_message(r#"{"message":"plan not available"}"#),
            "plan not available"
        );
    }

    #[test]
    fn test_extract_message_fallback_truncates() {
        let long = "x".repeat(400);
        assert_eq!(extract_message(&long).len(), 200);
    }

    #[test]
    fn test_normalize_unauthorized() {
        let err = BackendClient::normalize_failure("/users/me", StatusCode::UNAUTHORIZED, "");
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[test]
    fn test_normalize_not_found_names_path() {
        let err = BackendClient::normalize_failure("/companies/9", StatusCode::NOT_FOUND, "");
        assert!(matches!(err, ApiError::NotFound(path) if path == "/companies/9"));
    }

    #[test]
    fn test_normalize_validation() {
        let err = BackendClient::normalize_failure(
            "/categories",
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"errors":{"name":["is required"]}}"#,
        );
        match err {
            ApiError::Validation(errors) => assert_eq!(errors.field("name"), ["is required"]),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_normalize_malformed_422_degrades() {
        let err = BackendClient::normalize_failure(
            "/categories",
            StatusCode::UNPROCESSABLE_ENTITY,
            "not json",
        );
        assert!(matches!(err, ApiError::Status { status: 422, .. }));
    }
}
