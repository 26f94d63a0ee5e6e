//! Remote session monitoring endpoints.

use rdpanel_core::models::SuccessResponse;
use rdpanel_core::models::sessions::{ActiveSessions, SessionsByIp};
use reqwest::Method;
use serde_json::Value;

use crate::client::Client;
use crate::error::{ApiError, ApiResult};

/// `/sessions/*` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct SessionsApi<'a> {
    client: &'a Client,
}

impl Client {
    pub fn remote_sessions(&self) -> SessionsApi<'_> {
        SessionsApi { client: self }
    }
}

impl SessionsApi<'_> {
    pub async fn active(&self) -> ApiResult<ActiveSessions> {
        self.client.get(&["sessions", "active"]).await
    }

    /// Sessions started in the last `days` days, newest first.
    pub async fn history(&self, limit: u32, days: u32) -> ApiResult<Value> {
        self.client
            .get_query(&["sessions", "history"], &[("limit", limit), ("days", days)])
            .await
    }

    pub async fn terminate(&self, id: &str) -> ApiResult<SuccessResponse> {
        self.client
            .send(Method::DELETE, &["sessions", "terminate", id])
            .await
    }

    /// Block an address and terminate its active sessions.
    pub async fn block_ip(&self, ip: &str) -> ApiResult<SuccessResponse> {
        if ip.trim().is_empty() {
            return Err(ApiError::Validation("ip address must not be empty".into()));
        }
        self.client
            .send_query(Method::POST, &["sessions", "block-ip"], &[("ip_address", ip)])
            .await
    }

    pub async fn statistics(&self) -> ApiResult<Value> {
        self.client.get(&["sessions", "statistics"]).await
    }

    pub async fn details(&self, id: &str) -> ApiResult<Value> {
        self.client.get(&["sessions", id]).await
    }

    pub async fn by_ip(&self, ip: &str, limit: u32) -> ApiResult<SessionsByIp> {
        self.client
            .get_query(&["sessions", "by-ip", ip], &[("limit", limit)])
            .await
    }
}
