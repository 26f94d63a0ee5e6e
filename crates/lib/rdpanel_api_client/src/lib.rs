//! # rdpanel_api_client
//!
//! Typed, session-aware HTTP client for the rdpanel backend.
//!
//! Every authorized call carries the bearer token of the current session. A
//! `401` from any of them clears the session once and sends the front-end to
//! the login view; there is no token refresh and no retry.

pub mod auth;
pub mod client;
pub mod context;
pub mod dashboard;
pub mod error;
pub mod files;
pub mod logs;
pub mod rdp;
pub mod sessions;
pub mod settings;

pub use auth::{LoginOutcome, LoginRejection, RejectionKind};
pub use client::Client;
pub use context::AppContext;
pub use error::{ApiError, ApiResult};
