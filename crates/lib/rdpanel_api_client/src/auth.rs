//! Login, profile and credential management.
//!
//! The shape of a failed login is decoded once, here, into a
//! [`LoginOutcome`]; callers never look at statuses or headers themselves.

use rdpanel_core::models::SuccessResponse;
use rdpanel_core::models::auth::{LoginRequest, TokenResponse, TotpSetup, User};
use rdpanel_core::session::Session;
use reqwest::{Method, StatusCode};
use tracing::{info, warn};

use crate::client::{Client, decode, http_error};
use crate::error::{ApiError, ApiResult, error_message};

/// Message used when the backend gives no usable reason.
pub const DEFAULT_LOGIN_FAILURE: &str = "Login failed";

/// Message used when the backend cannot be reached.
pub const UNREACHABLE_MESSAGE: &str = "Unable to reach server";

/// Result of one login attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    /// Token and profile stored; the client is now authenticated.
    Authenticated(Session),
    /// Password accepted but a one-time code is needed. Not an error: the
    /// caller should prompt and retry with the code.
    SecondFactorRequired,
    Rejected(LoginRejection),
}

impl LoginOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, LoginOutcome::Authenticated(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    InvalidCredentials,
    Locked,
    Forbidden,
    Unreachable,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRejection {
    pub kind: RejectionKind,
    /// Display message for the login form.
    pub message: String,
}

impl LoginRejection {
    fn new(kind: RejectionKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Decode a non-2xx login response.
///
/// `second_factor` is whether the response carried the second-factor header
/// set to `true`; it takes precedence over the status.
pub fn decode_login_failure(status: StatusCode, second_factor: bool, body: &[u8]) -> LoginOutcome {
    if second_factor {
        return LoginOutcome::SecondFactorRequired;
    }

    let kind = match status {
        StatusCode::UNAUTHORIZED => RejectionKind::InvalidCredentials,
        StatusCode::LOCKED => RejectionKind::Locked,
        StatusCode::FORBIDDEN => RejectionKind::Forbidden,
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
            RejectionKind::Unreachable
        }
        _ => RejectionKind::Other,
    };
    let message = error_message(body).unwrap_or_else(|| DEFAULT_LOGIN_FAILURE.to_string());
    LoginOutcome::Rejected(LoginRejection::new(kind, message))
}

fn header_is_true(headers: &reqwest::header::HeaderMap, name: &str) -> bool {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}

impl Client {
    /// Log in with username, password and an optional one-time code.
    ///
    /// On success the token is exchanged for the user profile and both are
    /// persisted. No retry; a network failure is a
    /// [`RejectionKind::Unreachable`] rejection.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        second_factor_code: Option<&str>,
    ) -> LoginOutcome {
        let code = second_factor_code.map(str::trim).filter(|c| !c.is_empty());

        let url = match self.endpoint(&["auth", "login"]) {
            Ok(url) => url,
            Err(e) => return LoginOutcome::Rejected(LoginRejection::new(RejectionKind::Other, e.to_string())),
        };

        let body = LoginRequest {
            username,
            password,
            totp_code: code,
        };
        let response = match self.request(Method::POST, url).json(&body).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "login request failed");
                return LoginOutcome::Rejected(LoginRejection::new(
                    RejectionKind::Unreachable,
                    UNREACHABLE_MESSAGE,
                ));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let second_factor = header_is_true(response.headers(), &self.second_factor_header);
            let body = response.bytes().await.unwrap_or_default();
            let outcome = decode_login_failure(status, second_factor, &body);
            info!(username, %status, outcome = ?outcome, "login not completed");
            return outcome;
        }

        let token: TokenResponse = match decode(response).await {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "unreadable login response");
                return LoginOutcome::Rejected(LoginRejection::new(
                    RejectionKind::Other,
                    DEFAULT_LOGIN_FAILURE,
                ));
            }
        };

        if token.access_token.trim().is_empty() {
            warn!(username, "login response carried an empty token");
            return LoginOutcome::Rejected(LoginRejection::new(
                RejectionKind::Other,
                DEFAULT_LOGIN_FAILURE,
            ));
        }

        let user = match self.profile_with_token(&token.access_token).await {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "could not load profile after login");
                let kind = match e {
                    ApiError::Transport(_) => RejectionKind::Unreachable,
                    _ => RejectionKind::Other,
                };
                return LoginOutcome::Rejected(LoginRejection::new(kind, DEFAULT_LOGIN_FAILURE));
            }
        };

        match self.sessions().establish(token.access_token, user) {
            Ok(session) => LoginOutcome::Authenticated(session),
            Err(e) => {
                warn!(error = %e, "could not persist session");
                LoginOutcome::Rejected(LoginRejection::new(
                    RejectionKind::Other,
                    format!("Could not save session: {e}"),
                ))
            }
        }
    }

    /// `GET /auth/me` with an explicit token, outside the session.
    async fn profile_with_token(&self, token: &str) -> ApiResult<User> {
        let url = self.endpoint(&["auth", "me"])?;
        let response = self.request(Method::GET, url).bearer_auth(token).send().await?;
        if !response.status().is_success() {
            return Err(http_error(response).await);
        }
        decode(response).await
    }

    /// Clear the session. Always succeeds.
    pub fn logout(&self) {
        self.sessions().logout();
    }

    /// Current user profile.
    pub async fn me(&self) -> ApiResult<User> {
        self.get(&["auth", "me"]).await
    }

    /// Re-fetch the profile and replace the stored snapshot.
    ///
    /// Best effort: failures are logged and swallowed. A `401` still goes
    /// through the usual session invalidation.
    pub async fn refresh_user(&self) {
        let Some(session) = self.sessions().current() else {
            return;
        };
        match self.me().await {
            Ok(user) => {
                if let Err(e) = self.sessions().replace_user(session.epoch, user) {
                    warn!(error = %e, "could not store refreshed profile");
                }
            }
            Err(e) => warn!(error = %e, "profile refresh failed"),
        }
    }

    /// Start two-factor enrolment; returns the secret and its QR code.
    pub async fn setup_two_factor(&self) -> ApiResult<TotpSetup> {
        self.send(Method::POST, &["auth", "setup-2fa"]).await
    }

    /// Confirm enrolment with a code from the authenticator.
    pub async fn enable_two_factor(&self, code: &str) -> ApiResult<SuccessResponse> {
        let code = code.trim();
        if code.is_empty() {
            return Err(ApiError::Validation("code must not be empty".into()));
        }
        let resp = self
            .send_query(Method::POST, &["auth", "enable-2fa"], &[("totp_code", code)])
            .await?;
        self.refresh_user().await;
        Ok(resp)
    }

    pub async fn disable_two_factor(&self, password: &str) -> ApiResult<SuccessResponse> {
        let resp = self
            .send_query(Method::POST, &["auth", "disable-2fa"], &[("password", password)])
            .await?;
        self.refresh_user().await;
        Ok(resp)
    }

    /// Change the password.
    ///
    /// The backend answers a wrong current password with `401`, which
    /// invalidates the session like any other rejection.
    pub async fn change_password(&self, current: &str, new: &str) -> ApiResult<SuccessResponse> {
        if new.is_empty() {
            return Err(ApiError::Validation("new password must not be empty".into()));
        }
        self.send_query(
            Method::POST,
            &["auth", "change-password"],
            &[("current_password", current), ("new_password", new)],
        )
        .await
    }
}
