//! Client configuration.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

/// Default backend base URL; all resource paths are resolved under it.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8001/api";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Response header the backend sets when a login needs a one-time code.
pub const DEFAULT_SECOND_FACTOR_HEADER: &str = "x-require-totp";

/// Configuration for the rdpanel client.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Backend base URL, including the `/api` prefix.
    pub api_url: Url,
    /// Directory holding the persisted session file.
    pub state_dir: PathBuf,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Header name signalling "second factor required" on a login response.
    pub second_factor_header: String,
}

impl ClientConfig {
    /// Build a config for `api_url` with every other field at its default.
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            state_dir: default_state_dir(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            second_factor_header: DEFAULT_SECOND_FACTOR_HEADER.to_string(),
        }
    }

    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable                       | Default                       |
    /// |--------------------------------|-------------------------------|
    /// | `RDPANEL_API_URL`              | `http://127.0.0.1:8001/api`   |
    /// | `RDPANEL_STATE_DIR`            | `<data dir>/rdpanel`          |
    /// | `RDPANEL_TIMEOUT_SECS`         | `30`                          |
    /// | `RDPANEL_SECOND_FACTOR_HEADER` | `x-require-totp`              |
    pub fn from_env() -> Result<Self, url::ParseError> {
        let api_url = std::env::var("RDPANEL_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
        let timeout = std::env::var("RDPANEL_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            api_url: parse_api_url(&api_url)?,
            state_dir: std::env::var("RDPANEL_STATE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_state_dir()),
            request_timeout: Duration::from_secs(timeout),
            second_factor_header: std::env::var("RDPANEL_SECOND_FACTOR_HEADER")
                .ok()
                .filter(|h| !h.is_empty())
                .unwrap_or_else(|| DEFAULT_SECOND_FACTOR_HEADER.into()),
        })
    }

    /// Path of the persisted session file inside `state_dir`.
    pub fn session_file(&self) -> PathBuf {
        self.state_dir.join("session.json")
    }
}

/// Parse a base URL, forcing a trailing slash so `Url::join` keeps the last
/// path segment (`.../api` + `auth/me` must give `.../api/auth/me`).
pub fn parse_api_url(raw: &str) -> Result<Url, url::ParseError> {
    if raw.ends_with('/') {
        Url::parse(raw)
    } else {
        Url::parse(&format!("{raw}/"))
    }
}

/// `<platform data dir>/rdpanel`, or `./.rdpanel` when no data dir exists.
fn default_state_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("rdpanel"))
        .unwrap_or_else(|| PathBuf::from(".rdpanel"))
}
