//! `GET /dashboard/summary`

use bazaar_core::DashboardSummary;
use reqwest::Method;
use tracing::instrument;

use crate::client::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// Inventory aggregates for the admin dashboard.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn dashboard_summary(&self) -> Result<DashboardSummary, ApiError> {
        self.send(self.request(Method::GET, "/dashboard/summary"))
            .await
    }
}
