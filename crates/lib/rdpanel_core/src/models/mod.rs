//! Backend data models.
//!
//! Field names follow the backend's snake_case JSON. Timestamps are naive
//! ISO-8601 values (the backend emits UTC without an offset).

pub mod auth;
pub mod dashboard;
pub mod files;
pub mod logs;
pub mod rdp;
pub mod sessions;
pub mod settings;

use serde::{Deserialize, Serialize};

/// Timestamp as emitted by the backend.
pub type Timestamp = chrono::NaiveDateTime;

/// Generic acknowledgement body returned by mutating endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessResponse {
    #[serde(default = "default_true")]
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

fn default_true() -> bool {
    true
}

/// Body of a plain `{"message": ...}` reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
