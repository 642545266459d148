// Trait boundary between the refresh orchestrator and the network.
//
// DashboardSource abstracts the aggregate fetch so the controller can be
// driven by a scripted mock in tests: no network, no live backend.

use async_trait::async_trait;

use stratwatch_client::types::DashboardResponse;
use stratwatch_client::{ApiError, IntelClient};

#[async_trait]
pub trait DashboardSource: Send + Sync {
    /// Fetch the aggregate dashboard payload.
    async fn fetch_dashboard(&self) -> Result<DashboardResponse, ApiError>;
}

#[async_trait]
impl DashboardSource for IntelClient {
    async fn fetch_dashboard(&self) -> Result<DashboardResponse, ApiError> {
        self.dashboard().await
    }
}
