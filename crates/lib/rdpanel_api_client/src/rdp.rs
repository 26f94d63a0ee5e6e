//! Remote-desktop connection endpoints.

use rdpanel_core::models::SuccessResponse;
use rdpanel_core::models::rdp::{
    ActiveConnections, ClipboardContent, KEY_COMBINATIONS, MAX_CLIPBOARD_CHARS, NewRdpConnection,
    RdpConnection, is_supported_key_combination,
};
use reqwest::Method;
use serde_json::Value;

use crate::client::Client;
use crate::error::{ApiError, ApiResult};

/// `/rdp/*` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct RdpApi<'a> {
    client: &'a Client,
}

impl Client {
    pub fn rdp(&self) -> RdpApi<'_> {
        RdpApi { client: self }
    }
}

impl RdpApi<'_> {
    pub async fn create(&self, connection: &NewRdpConnection) -> ApiResult<RdpConnection> {
        if connection.host.trim().is_empty() {
            return Err(ApiError::Validation("host must not be empty".into()));
        }
        self.client
            .send_json(Method::POST, &["rdp", "connections"], connection)
            .await
    }

    /// Connections owned by the current user.
    pub async fn list(&self) -> ApiResult<Vec<RdpConnection>> {
        self.client.get(&["rdp", "connections"]).await
    }

    pub async fn get(&self, id: &str) -> ApiResult<RdpConnection> {
        self.client.get(&["rdp", "connections", id]).await
    }

    pub async fn terminate(&self, id: &str) -> ApiResult<SuccessResponse> {
        self.client
            .send(Method::DELETE, &["rdp", "connections", id])
            .await
    }

    pub async fn status(&self, id: &str) -> ApiResult<Value> {
        self.client.get(&["rdp", "connections", id, "status"]).await
    }

    pub async fn statistics(&self) -> ApiResult<Value> {
        self.client.get(&["rdp", "statistics"]).await
    }

    /// Capture the remote screen. The image comes back base64-encoded in the
    /// `screenshot` field.
    pub async fn screenshot(&self, id: &str) -> ApiResult<Value> {
        self.client
            .send(Method::POST, &["rdp", "connections", id, "screenshot"])
            .await
    }

    /// Send a key combination such as `ctrl+alt+del`. Unsupported
    /// combinations are refused without a request.
    pub async fn send_keys(&self, id: &str, keys: &str) -> ApiResult<SuccessResponse> {
        if !is_supported_key_combination(keys) {
            return Err(ApiError::Validation(format!(
                "unsupported key combination '{keys}', expected one of: {}",
                KEY_COMBINATIONS.join(", ")
            )));
        }
        let keys = keys.to_ascii_lowercase();
        self.client
            .send_query(
                Method::POST,
                &["rdp", "connections", id, "send-keys"],
                &[("keys", keys.as_str())],
            )
            .await
    }

    pub async fn clipboard(&self, id: &str) -> ApiResult<ClipboardContent> {
        self.client
            .get(&["rdp", "connections", id, "clipboard"])
            .await
    }

    pub async fn set_clipboard(&self, id: &str, content: &str) -> ApiResult<SuccessResponse> {
        if content.chars().count() > MAX_CLIPBOARD_CHARS {
            return Err(ApiError::Validation(format!(
                "clipboard content exceeds {MAX_CLIPBOARD_CHARS} characters"
            )));
        }
        self.client
            .send_query(
                Method::POST,
                &["rdp", "connections", id, "clipboard"],
                &[("content", content)],
            )
            .await
    }

    pub async fn resize(&self, id: &str, width: u32, height: u32) -> ApiResult<SuccessResponse> {
        if width == 0 || height == 0 {
            return Err(ApiError::Validation("width and height must be positive".into()));
        }
        self.client
            .send_query(
                Method::POST,
                &["rdp", "connections", id, "resize"],
                &[("width", width), ("height", height)],
            )
            .await
    }

    /// Live figures for every connected session.
    pub async fn active_connections(&self) -> ApiResult<ActiveConnections> {
        self.client.get(&["rdp", "active-connections"]).await
    }
}
