//! Login, logout and profile refresh against the mock backend.

mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use common::{ADMIN_TOKEN, TOTP_CODE, config_for, harness, logged_in};
use rdpanel_api_client::{AppContext, LoginOutcome, RejectionKind};
use rdpanel_core::navigation::NoopNavigator;
use rdpanel_core::notify::LogNotifier;

#[tokio::test]
async fn password_only_requires_second_factor() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path()).await;

    let outcome = h.client.login("admin", "admin123", None).await;

    assert_eq!(outcome, LoginOutcome::SecondFactorRequired);
    assert!(!h.client.sessions().is_authenticated());
    assert!(!h.config.session_file().exists());
}

#[tokio::test]
async fn password_and_code_establish_session() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path()).await;

    let outcome = h.client.login("admin", "admin123", Some(TOTP_CODE)).await;

    let LoginOutcome::Authenticated(session) = outcome else {
        panic!("expected authenticated, got {outcome:?}");
    };
    assert_eq!(session.token, ADMIN_TOKEN);
    assert_eq!(session.user.username, "admin");

    let raw = std::fs::read_to_string(h.config.session_file()).unwrap();
    let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored["token"], ADMIN_TOKEN);
    assert!(stored["user"].as_str().unwrap().contains("\"username\":\"admin\""));
}

#[tokio::test]
async fn wrong_password_is_rejected_with_backend_message() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path()).await;

    let outcome = h.client.login("admin", "wrongpass", None).await;

    let LoginOutcome::Rejected(rejection) = outcome else {
        panic!("expected rejection, got {outcome:?}");
    };
    assert_eq!(rejection.kind, RejectionKind::InvalidCredentials);
    assert_eq!(rejection.message, "Invalid credentials");
    assert!(!h.client.sessions().is_authenticated());
}

#[tokio::test]
async fn empty_token_is_rejected_and_not_stored() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path()).await;

    let outcome = h.client.login("tokenless", "anything", None).await;

    let LoginOutcome::Rejected(rejection) = outcome else {
        panic!("expected rejection, got {outcome:?}");
    };
    assert_eq!(rejection.kind, RejectionKind::Other);
    assert_eq!(rejection.message, "Login failed");
    assert!(!h.client.sessions().is_authenticated());
    assert!(!h.config.session_file().exists());
}

#[tokio::test]
async fn wrong_code_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path()).await;

    let outcome = h.client.login("admin", "admin123", Some("000000")).await;

    let LoginOutcome::Rejected(rejection) = outcome else {
        panic!("expected rejection, got {outcome:?}");
    };
    assert_eq!(rejection.message, "Invalid TOTP code");
}

#[tokio::test]
async fn blank_code_counts_as_missing() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path()).await;

    let outcome = h.client.login("admin", "admin123", Some("   ")).await;
    assert_eq!(outcome, LoginOutcome::SecondFactorRequired);
}

#[tokio::test]
async fn locked_account_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path()).await;

    let LoginOutcome::Rejected(rejection) = h.client.login("locked", "x", None).await else {
        panic!("expected rejection");
    };
    assert_eq!(rejection.kind, RejectionKind::Locked);
}

#[tokio::test]
async fn unreachable_backend_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let ctx = AppContext::start(
        &config_for(addr, dir.path()),
        Arc::new(NoopNavigator),
        Arc::new(LogNotifier),
    )
    .unwrap();

    let LoginOutcome::Rejected(rejection) = ctx.client().login("admin", "admin123", None).await
    else {
        panic!("expected rejection");
    };
    assert_eq!(rejection.kind, RejectionKind::Unreachable);
    assert_eq!(rejection.message, "Unable to reach server");
}

#[tokio::test]
async fn logout_clears_storage_and_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let h = logged_in(dir.path()).await;
    assert!(h.config.session_file().exists());

    h.client.logout();
    assert!(!h.client.sessions().is_authenticated());
    assert!(!h.config.session_file().exists());

    h.client.logout();
    assert!(!h.client.sessions().is_authenticated());
    assert!(!h.config.session_file().exists());
    assert_eq!(h.notifier.notices().len(), 2);
    assert!(h.navigator.routes().is_empty());
}

#[tokio::test]
async fn refresh_failure_keeps_session() {
    let dir = tempfile::tempdir().unwrap();
    let h = logged_in(dir.path()).await;
    h.backend.me_fails.store(true, Ordering::SeqCst);

    h.client.refresh_user().await;

    let session = h.client.sessions().current().unwrap();
    assert_eq!(session.user.username, "admin");
}

#[tokio::test]
async fn enabling_second_factor_refreshes_profile() {
    let dir = tempfile::tempdir().unwrap();
    let h = logged_in(dir.path()).await;
    assert!(!h.client.sessions().current().unwrap().user.totp_enabled);

    let resp = h.client.enable_two_factor("654321").await.unwrap();

    assert!(resp.success);
    assert!(h.client.sessions().current().unwrap().user.totp_enabled);
}

#[tokio::test]
async fn session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let h = logged_in(dir.path()).await;

    let ctx = AppContext::start(&h.config, Arc::new(NoopNavigator), Arc::new(LogNotifier)).unwrap();
    let session = ctx.sessions().current().unwrap();
    assert_eq!(session.token, ADMIN_TOKEN);

    let stats = ctx.client().dashboard().stats().await.unwrap();
    assert_eq!(stats.active_sessions, 2);
}
