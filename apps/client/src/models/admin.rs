use serde::{Deserialize, Serialize};

/// Subscriber counts per plan, for the admin dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanDistribution {
    pub starter: f64,
    pub basic: f64,
    pub enterprise: f64,
}

/// Health of one backing service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerStatus {
    pub name: String,
    pub uptime: f64,
    pub response_time: f64,
    pub up: bool,
}
