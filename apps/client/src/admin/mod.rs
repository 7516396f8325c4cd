//! Admin dashboard reads: plan distribution and backing-service health.

use crate::errors::ApiError;
use crate::http::ApiClient;
use crate::models::{PlanDistribution, ServerStatus};

#[derive(Clone)]
pub struct AdminStore {
    client: ApiClient,
}

impl AdminStore {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn plan_distribution(&self) -> Result<PlanDistribution, ApiError> {
        self.client
            .get("/admin/dashboard/plan")
            .send()
            .await?
            .json()
            .await
    }

    pub async fn server_status(&self) -> Result<Vec<ServerStatus>, ApiError> {
        self.client
            .get("/admin/dashboard/server-status")
            .send()
            .await?
            .json()
            .await
    }
}
