//! Gateway client: bearer authorization and the global 401 policy.

use std::sync::Arc;

use rdpanel_core::config::ClientConfig;
use rdpanel_core::navigation::{Navigator, Route};
use rdpanel_core::session::SessionStore;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::{ApiError, ApiResult, error_message};

/// HTTP client for the rdpanel backend.
///
/// Cheap to share behind an `Arc`; all state lives in the [`SessionStore`].
pub struct Client {
    http: reqwest::Client,
    base: Url,
    sessions: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
    pub(crate) second_factor_header: String,
}

impl Client {
    pub fn new(
        config: &ClientConfig,
        sessions: Arc<SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("rdpanel/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base: config.api_url.clone(),
            sessions,
            navigator,
            second_factor_header: config.second_factor_header.clone(),
        })
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Resolve `segments` under the base URL. Each segment is percent-encoded;
    /// a trailing empty segment yields a trailing slash.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Validation(format!("base URL {} cannot hold a path", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Like [`endpoint`](Self::endpoint), with a slash-separated remote path
    /// appended segment by segment.
    pub(crate) fn endpoint_with_path(&self, segments: &[&str], path: &str) -> ApiResult<Url> {
        let mut all: Vec<&str> = segments.to_vec();
        all.extend(path.split('/').filter(|s| !s.is_empty()));
        self.endpoint(&all)
    }

    /// Unauthenticated request builder.
    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http.request(method, url)
    }

    /// Send an authorized request.
    ///
    /// Fails with [`ApiError::NotAuthenticated`] without sending when there is
    /// no session. A `401` clears the session the request was made with and,
    /// if this call was the one to clear it, navigates to the login view.
    pub(crate) async fn execute(&self, builder: RequestBuilder) -> ApiResult<Response> {
        let session = self.sessions.current().ok_or(ApiError::NotAuthenticated)?;
        let response = builder.bearer_auth(&session.token).send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            let body = response.bytes().await.unwrap_or_default();
            let message = error_message(&body).unwrap_or_else(|| "Unauthorized".to_string());
            self.reject_session(session.epoch);
            return Err(ApiError::Unauthorized(message));
        }

        if !status.is_success() {
            return Err(http_error(response).await);
        }

        Ok(response)
    }

    fn reject_session(&self, epoch: u64) {
        if self.sessions.invalidate(epoch) {
            warn!("authorization rejected by backend, returning to login");
            self.navigator.navigate(Route::Login);
        } else {
            debug!(epoch, "authorization rejected for a session already cleared");
        }
    }

    pub(crate) async fn json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        let response = self.execute(builder).await?;
        decode(response).await
    }

    pub(crate) async fn text(&self, builder: RequestBuilder) -> ApiResult<String> {
        Ok(self.execute(builder).await?.text().await?)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> ApiResult<T> {
        let url = self.endpoint(segments)?;
        self.json(self.request(Method::GET, url)).await
    }

    pub(crate) async fn get_query<T, Q>(&self, segments: &[&str], query: &Q) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let url = self.endpoint(segments)?;
        self.json(self.request(Method::GET, url).query(query)).await
    }

    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
    ) -> ApiResult<T> {
        let url = self.endpoint(segments)?;
        self.json(self.request(method, url)).await
    }

    pub(crate) async fn send_query<T, Q>(
        &self,
        method: Method,
        segments: &[&str],
        query: &Q,
    ) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let url = self.endpoint(segments)?;
        self.json(self.request(method, url).query(query)).await
    }

    pub(crate) async fn send_json<T, B>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let url = self.endpoint(segments)?;
        self.json(self.request(method, url).json(body)).await
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base", &self.base.as_str())
            .field("sessions", &self.sessions)
            .finish_non_exhaustive()
    }
}

/// Decode a JSON body, keeping the decode failure apart from transport errors.
pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let url = response.url().path().to_string();
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(format!("{url}: {e}")))
}

/// Turn a non-2xx response into [`ApiError::Http`].
pub(crate) async fn http_error(response: Response) -> ApiError {
    let status = response.status();
    let body = response.bytes().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    });
    ApiError::Http { status, message }
}
