//! Audit and system log endpoints.

use rdpanel_core::models::SuccessResponse;
use rdpanel_core::models::Timestamp;
use rdpanel_core::models::logs::{
    ExportFormat, LogEntry, LogLevel, LogQuery, LogSource, MAX_EXPORT_LIMIT, MAX_LOG_LIMIT,
    RealtimeLogs,
};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::client::Client;
use crate::error::ApiResult;

/// Filter for [`LogsApi::clear`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClearFilter {
    /// Only entries older than this many days; 0 means all.
    pub older_than_days: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<LogLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<LogSource>,
}

#[derive(Serialize)]
struct ExportQuery<'a> {
    format: ExportFormat,
    #[serde(flatten)]
    query: &'a LogQuery,
}

#[derive(Serialize)]
struct NewEntry<'a> {
    level: LogLevel,
    source: LogSource,
    message: &'a str,
}

/// `/logs/*` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct LogsApi<'a> {
    client: &'a Client,
}

impl Client {
    pub fn logs(&self) -> LogsApi<'_> {
        LogsApi { client: self }
    }
}

impl LogsApi<'_> {
    /// Entries matching `query`, newest first. `limit` is clamped to what the
    /// backend accepts.
    pub async fn list(&self, query: &LogQuery) -> ApiResult<Vec<LogEntry>> {
        self.client
            .get_query(&["logs", ""], &query.clamped(MAX_LOG_LIMIT))
            .await
    }

    /// Levels with per-level counts.
    pub async fn levels(&self) -> ApiResult<Value> {
        self.client.get(&["logs", "levels"]).await
    }

    pub async fn sources(&self) -> ApiResult<Value> {
        self.client.get(&["logs", "sources"]).await
    }

    pub async fn statistics(&self, days: u32) -> ApiResult<Value> {
        self.client
            .get_query(&["logs", "statistics"], &[("days", days)])
            .await
    }

    pub async fn clear(&self, filter: &ClearFilter) -> ApiResult<SuccessResponse> {
        self.client
            .send_query(Method::DELETE, &["logs", "clear"], filter)
            .await
    }

    /// Export as raw text in the requested format.
    pub async fn export(&self, format: ExportFormat, query: &LogQuery) -> ApiResult<String> {
        let query = query.clamped(MAX_EXPORT_LIMIT);
        let url = self.client.endpoint(&["logs", "export"])?;
        let params = ExportQuery {
            format,
            query: &query,
        };
        self.client
            .text(self.client.request(Method::GET, url).query(&params))
            .await
    }

    /// Entries since `since`; the backend defaults to the last five minutes.
    pub async fn realtime(&self, since: Option<Timestamp>) -> ApiResult<RealtimeLogs> {
        match since {
            Some(since) => {
                self.client
                    .get_query(&["logs", "realtime"], &[("since", since)])
                    .await
            }
            None => self.client.get(&["logs", "realtime"]).await,
        }
    }

    /// Append a custom entry. `details` is sent as the JSON body.
    pub async fn add(
        &self,
        level: LogLevel,
        source: LogSource,
        message: &str,
        details: Option<&Value>,
    ) -> ApiResult<SuccessResponse> {
        let url = self.client.endpoint(&["logs", "add"])?;
        let mut builder = self.client.request(Method::POST, url).query(&NewEntry {
            level,
            source,
            message,
        });
        if let Some(details) = details {
            builder = builder.json(details);
        }
        self.client.json(builder).await
    }
}
