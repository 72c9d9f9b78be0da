//! Analytics queries for the admin dashboard.

use tracing::{debug, instrument};

use super::cache::{CacheKey, CacheTag, CacheValue};
use super::types::AnalyticsSummary;
use super::{ApiError, BackendApi};

impl BackendApi {
    /// Aggregate platform counters (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn analytics_summary(&self, token: &str) -> Result<AnalyticsSummary, ApiError> {
        if let Some(CacheValue::Analytics(summary)) =
            self.cache().get(&CacheKey::AnalyticsSummary).await
        {
            debug!("Cache hit for analytics summary");
            return Ok(*summary);
        }

        let summary: AnalyticsSummary = self
            .client()
            .get("/analytics/summary", Some(token), &[])
            .await?;

        self.cache()
            .insert(
                CacheKey::AnalyticsSummary,
                &[CacheTag::Analytics],
                CacheValue::Analytics(Box::new(summary.clone())),
            )
            .await;

        Ok(summary)
    }
}
