//! Remote-desktop connection models.

use serde::{Deserialize, Serialize};

use super::Timestamp;

/// Default RDP port.
pub const DEFAULT_RDP_PORT: u16 = 3389;

/// Maximum clipboard payload the backend accepts, in characters.
pub const MAX_CLIPBOARD_CHARS: usize = 10_000;

/// Key combinations the backend forwards to a session.
pub const KEY_COMBINATIONS: &[&str] = &[
    "ctrl+alt+del",
    "alt+tab",
    "alt+f4",
    "win+r",
    "win+l",
    "ctrl+c",
    "ctrl+v",
    "ctrl+x",
    "ctrl+z",
    "ctrl+s",
];

/// Whether `keys` is one of [`KEY_COMBINATIONS`] (case-insensitive).
pub fn is_supported_key_combination(keys: &str) -> bool {
    let keys = keys.to_ascii_lowercase();
    KEY_COMBINATIONS.contains(&keys.as_str())
}

/// Display quality requested for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RdpQuality {
    Low,
    Medium,
    #[default]
    High,
    Ultra,
}

/// Lifecycle of a connection as tracked by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RdpStatus {
    Connecting,
    Connected,
    #[default]
    Disconnected,
    Error,
}

/// A remote-desktop connection record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RdpConnection {
    pub id: String,
    pub user_id: String,
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub username: String,
    #[serde(default)]
    pub quality: RdpQuality,
    #[serde(default)]
    pub status: RdpStatus,
    #[serde(default)]
    pub start_time: Option<Timestamp>,
    #[serde(default)]
    pub end_time: Option<Timestamp>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// `POST /rdp/connections` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRdpConnection {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub quality: RdpQuality,
}

impl NewRdpConnection {
    pub fn new(host: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_RDP_PORT,
            username: username.into(),
            password: password.into(),
            quality: RdpQuality::default(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_RDP_PORT
}

/// Live figures for one connected session (`GET /rdp/active-connections`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveConnection {
    pub connection_id: String,
    pub host: String,
    pub port: u16,
    pub start_time: Timestamp,
    #[serde(default)]
    pub latency: f64,
    #[serde(default)]
    pub bandwidth: f64,
    #[serde(default)]
    pub resolution: String,
    #[serde(default)]
    pub fps: f64,
}

/// `GET /rdp/active-connections` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveConnections {
    pub active_connections: Vec<ActiveConnection>,
}

/// `GET /rdp/connections/{id}/clipboard` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipboardContent {
    pub content: String,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_combinations_are_case_insensitive() {
        assert!(is_supported_key_combination("Ctrl+Alt+Del"));
        assert!(!is_supported_key_combination("ctrl+alt+backspace"));
    }

    #[test]
    fn connection_ignores_password_field() {
        let conn: RdpConnection = serde_json::from_str(
            r#"{"id":"c1","user_id":"u1","host":"10.0.0.5","username":"bob",
                "password":"gAAAA...","status":"connected"}"#,
        )
        .unwrap();
        assert_eq!(conn.port, DEFAULT_RDP_PORT);
        assert_eq!(conn.status, RdpStatus::Connected);
        assert_eq!(conn.quality, RdpQuality::High);
    }
}
