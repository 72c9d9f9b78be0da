//! Instance health check.

use thiserror::Error;

/// Errors that can occur during a health check.
#[derive(Debug, Error)]
pub enum HealthError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Instance answered but is not healthy.
    #[error("Instance unhealthy: HTTP {0}")]
    Unhealthy(u16),
}

/// Ping a running web instance's liveness and readiness endpoints.
///
/// # Errors
///
/// Returns [`HealthError`] when the instance is unreachable or reports
/// itself unhealthy.
pub async fn check(base_url: &str) -> Result<(), HealthError> {
    let base_url = base_url.trim_end_matches('/');
    let client = reqwest::Client::new();

    let live = client.get(format!("{base_url}/health")).send().await?;
    if !live.status().is_success() {
        return Err(HealthError::Unhealthy(live.status().as_u16()));
    }
    tracing::info!("liveness: ok");

    let ready = client.get(format!("{base_url}/health/ready")).send().await?;
    if !ready.status().is_success() {
        return Err(HealthError::Unhealthy(ready.status().as_u16()));
    }
    tracing::info!("readiness: ok");

    Ok(())
}
