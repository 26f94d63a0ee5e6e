//! Application settings endpoints.

use rdpanel_core::models::SuccessResponse;
use rdpanel_core::models::settings::{
    AppSettings, FileSettings, NotificationSettings, RdpSettings, SecuritySettings,
    SystemSettings,
};
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::Client;
use crate::error::{ApiError, ApiResult};

/// A settings section with its own `/settings/{name}` endpoint.
pub trait SettingsSection: Serialize + DeserializeOwned {
    const NAME: &'static str;
}

impl SettingsSection for SecuritySettings {
    const NAME: &'static str = "security";
}

impl SettingsSection for RdpSettings {
    const NAME: &'static str = "rdp";
}

impl SettingsSection for FileSettings {
    const NAME: &'static str = "files";
}

impl SettingsSection for NotificationSettings {
    const NAME: &'static str = "notifications";
}

impl SettingsSection for SystemSettings {
    const NAME: &'static str = "system";
}

/// `/settings/*` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct SettingsApi<'a> {
    client: &'a Client,
}

impl Client {
    pub fn settings(&self) -> SettingsApi<'_> {
        SettingsApi { client: self }
    }
}

impl SettingsApi<'_> {
    pub async fn get(&self) -> ApiResult<AppSettings> {
        self.client.get(&["settings", ""]).await
    }

    pub async fn update(&self, settings: &AppSettings) -> ApiResult<SuccessResponse> {
        self.client
            .send_json(Method::PUT, &["settings", ""], settings)
            .await
    }

    /// One section, e.g. `section::<SecuritySettings>()`.
    pub async fn section<S: SettingsSection>(&self) -> ApiResult<S> {
        self.client.get(&["settings", S::NAME]).await
    }

    pub async fn update_section<S: SettingsSection>(&self, section: &S) -> ApiResult<SuccessResponse> {
        self.client
            .send_json(Method::PUT, &["settings", S::NAME], section)
            .await
    }

    /// Restore every section to the backend defaults.
    pub async fn reset(&self) -> ApiResult<SuccessResponse> {
        self.client.send(Method::POST, &["settings", "reset"]).await
    }

    /// Backup document, kept as raw JSON so it can be restored unchanged.
    pub async fn backup(&self) -> ApiResult<Value> {
        self.client.get(&["settings", "backup"]).await
    }

    pub async fn restore(&self, backup: &Value) -> ApiResult<SuccessResponse> {
        if !backup.get("settings").is_some_and(Value::is_object) {
            return Err(ApiError::Validation(
                "backup has no settings object".into(),
            ));
        }
        self.client
            .send_json(Method::POST, &["settings", "restore"], backup)
            .await
    }
}
