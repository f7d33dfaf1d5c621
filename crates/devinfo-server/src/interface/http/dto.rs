use serde::{Deserialize, Serialize};

use crate::domain::{EndpointInfo, RequestContext, ServiceInfo, SystemFacts};

/// `GET /` 响应体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexResponse {
    pub service: ServiceInfo,
    pub system: SystemFacts,
    pub runtime: RuntimeInfo,
    pub request: RequestContext,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeInfo {
    pub uptime_seconds: u64,
    pub uptime_human: String,
    pub current_time: String,
    pub timezone: String,
}

/// `GET /health` 响应体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime_seconds: u64,
}

pub const HEALTHY: &str = "healthy";
pub const TIMEZONE_UTC: &str = "UTC";
