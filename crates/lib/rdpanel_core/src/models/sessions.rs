//! Remote session models (RDP, web panel and file-transfer sessions).

use serde::{Deserialize, Serialize};

use super::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionKind {
    #[serde(rename = "RDP")]
    Rdp,
    #[serde(rename = "Web Panel")]
    WebPanel,
    #[serde(rename = "File Transfer")]
    FileTransfer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Active,
    Inactive,
    Terminated,
}

/// A session observed by the backend. Not to be confused with the local
/// authentication [`Session`](crate::session::Session).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteSession {
    pub id: String,
    pub user_id: String,
    pub session_type: SessionKind,
    pub ip_address: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    pub start_time: Timestamp,
    #[serde(default)]
    pub end_time: Option<Timestamp>,
    #[serde(default)]
    pub status: SessionStatus,
    /// MB.
    #[serde(default)]
    pub bandwidth_used: f64,
    /// Seconds.
    #[serde(default)]
    pub duration: Option<u64>,
}

/// Entry of `GET /sessions/active`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveSession {
    #[serde(flatten)]
    pub session: RemoteSession,
    pub duration_seconds: u64,
    pub duration_string: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveSessions {
    pub sessions: Vec<ActiveSession>,
    pub count: usize,
}

/// Entry of the history and by-ip listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(flatten)]
    pub session: RemoteSession,
    #[serde(default)]
    pub duration_seconds: u64,
}

/// `GET /sessions/by-ip/{ip}` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionsByIp {
    pub ip_address: String,
    pub sessions: Vec<SessionRecord>,
    pub total_sessions: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_session_flattens_remote_fields() {
        let active: ActiveSession = serde_json::from_value(serde_json::json!({
            "id": "s1",
            "user_id": "u1",
            "session_type": "Web Panel",
            "ip_address": "203.0.113.7",
            "start_time": "2024-01-01T10:00:00",
            "status": "active",
            "duration_seconds": 3720,
            "duration_string": "1h 2m",
            "location": "Unknown, Unknown"
        }))
        .unwrap();
        assert_eq!(active.session.session_type, SessionKind::WebPanel);
        assert_eq!(active.duration_string, "1h 2m");
    }
}
