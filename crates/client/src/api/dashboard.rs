//! Dashboard summary operations.

use reqwest::Method;
use tracing::instrument;

use super::types::DashboardSummary;
use super::{ApiError, InventoryApi};

impl InventoryApi {
    /// Fetch entity counts and per-category stock totals.
    ///
    /// Not cached: the totals move with every receipt and completed issue.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn dashboard_summary(&self) -> Result<DashboardSummary, ApiError> {
        let request = self.request(Method::GET, "/api/dashboard/summary");

        self.execute(request).await
    }
}
