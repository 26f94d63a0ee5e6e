//! Audit and system log models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Timestamp;

/// Largest `limit` the log listing accepts.
pub const MAX_LOG_LIMIT: u32 = 1000;

/// Largest `limit` the log export accepts.
pub const MAX_EXPORT_LIMIT: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    pub const ALL: &[LogLevel] = &[
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warning,
        LogLevel::Error,
        LogLevel::Critical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogLevel::ALL
            .iter()
            .copied()
            .find(|l| l.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown log level '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogSource {
    AuthService,
    RdpServer,
    FileManager,
    System,
    WebPanel,
}

impl LogSource {
    pub const ALL: &[LogSource] = &[
        LogSource::AuthService,
        LogSource::RdpServer,
        LogSource::FileManager,
        LogSource::System,
        LogSource::WebPanel,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LogSource::AuthService => "AUTH_SERVICE",
            LogSource::RdpServer => "RDP_SERVER",
            LogSource::FileManager => "FILE_MANAGER",
            LogSource::System => "SYSTEM",
            LogSource::WebPanel => "WEB_PANEL",
        }
    }
}

impl fmt::Display for LogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.replace('-', "_");
        LogSource::ALL
            .iter()
            .copied()
            .find(|src| src.as_str().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| format!("unknown log source '{s}'"))
    }
}

/// One log line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(default)]
    pub id: String,
    pub timestamp: Timestamp,
    pub level: LogLevel,
    pub source: LogSource,
    pub message: String,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
}

/// Filter for `GET /logs/`, sent as query parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<LogLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<LogSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
    pub limit: u32,
}

impl Default for LogQuery {
    fn default() -> Self {
        Self {
            level: None,
            source: None,
            start_date: None,
            end_date: None,
            search_term: None,
            limit: 100,
        }
    }
}

impl LogQuery {
    /// Copy of this query with `limit` clamped to what the backend accepts.
    pub fn clamped(&self, max: u32) -> Self {
        Self {
            limit: self.limit.clamp(1, max),
            ..self.clone()
        }
    }
}

/// Export encoding for `GET /logs/export`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

/// `GET /logs/realtime` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealtimeLogs {
    pub logs: Vec<LogEntry>,
    pub since: Timestamp,
    pub count: usize,
    pub last_update: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_parses_case_insensitively() {
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warning);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn source_accepts_dashes() {
        assert_eq!(
            "auth-service".parse::<LogSource>().unwrap(),
            LogSource::AuthService
        );
    }

    #[test]
    fn source_serializes_screaming_snake() {
        assert_eq!(
            serde_json::to_value(LogSource::RdpServer).unwrap(),
            serde_json::json!("RDP_SERVER")
        );
    }

    #[test]
    fn clamped_caps_limit() {
        let query = LogQuery {
            limit: 50_000,
            ..LogQuery::default()
        };
        assert_eq!(query.clamped(MAX_LOG_LIMIT).limit, 1000);
        let zero = LogQuery {
            limit: 0,
            ..LogQuery::default()
        };
        assert_eq!(zero.clamped(MAX_LOG_LIMIT).limit, 1);
    }
}
