//! Dashboard and host monitoring endpoints.

use rdpanel_core::models::MessageResponse;
use rdpanel_core::models::dashboard::{DashboardStats, MetricsHistory, SystemMetrics};
use reqwest::Method;
use serde_json::Value;

use crate::client::Client;
use crate::error::ApiResult;

/// `/dashboard/*` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct DashboardApi<'a> {
    client: &'a Client,
}

impl Client {
    pub fn dashboard(&self) -> DashboardApi<'_> {
        DashboardApi { client: self }
    }
}

impl DashboardApi<'_> {
    pub async fn stats(&self) -> ApiResult<DashboardStats> {
        self.client.get(&["dashboard", "stats"]).await
    }

    pub async fn current_metrics(&self) -> ApiResult<SystemMetrics> {
        self.client.get(&["dashboard", "metrics", "current"]).await
    }

    /// Samples from the last `hours` hours.
    pub async fn metrics_history(&self, hours: u32) -> ApiResult<MetricsHistory> {
        self.client
            .get_query(&["dashboard", "metrics", "history"], &[("hours", hours)])
            .await
    }

    pub async fn active_sessions(&self) -> ApiResult<Value> {
        self.client.get(&["dashboard", "sessions", "active"]).await
    }

    pub async fn health(&self) -> ApiResult<Value> {
        self.client.get(&["dashboard", "health"]).await
    }

    pub async fn system_info(&self) -> ApiResult<Value> {
        self.client.get(&["dashboard", "system-info"]).await
    }

    /// Top processes by CPU.
    pub async fn processes(&self, limit: u32) -> ApiResult<Value> {
        self.client
            .get_query(&["dashboard", "processes"], &[("limit", limit)])
            .await
    }

    pub async fn start_monitoring(&self) -> ApiResult<MessageResponse> {
        self.client
            .send(Method::POST, &["dashboard", "monitoring", "start"])
            .await
    }

    pub async fn stop_monitoring(&self) -> ApiResult<MessageResponse> {
        self.client
            .send(Method::POST, &["dashboard", "monitoring", "stop"])
            .await
    }
}
