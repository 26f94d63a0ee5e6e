//! In-process mock of the rdpanel backend.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, Path as UrlPath, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use rdpanel_api_client::Client;
use rdpanel_core::config::{ClientConfig, parse_api_url};
use rdpanel_core::navigation::RecordingNavigator;
use rdpanel_core::notify::RecordingNotifier;
use rdpanel_core::session::SessionStore;
use rdpanel_core::storage::FileStore;
use serde::Deserialize;
use serde_json::json;

pub const ADMIN_TOKEN: &str = "tok-admin";
pub const TOTP_CODE: &str = "123456";

#[derive(Default)]
pub struct Backend {
    tokens: Mutex<HashSet<String>>,
    pub me_fails: AtomicBool,
    pub totp_enabled: AtomicBool,
    pub stats_hits: AtomicUsize,
    pub last_log_query: Mutex<HashMap<String, String>>,
    pub uploads: Mutex<Vec<(String, Vec<u8>, String)>>,
}

impl Backend {
    /// Make every issued token invalid, as if it expired.
    pub fn revoke_all(&self) {
        self.tokens.lock().unwrap().clear();
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<(), Response> {
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        match token {
            Some(t) if self.tokens.lock().unwrap().contains(t) => Ok(()),
            _ => Err(detail(StatusCode::UNAUTHORIZED, "Could not validate credentials")),
        }
    }
}

type Shared = Arc<Backend>;

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

#[derive(Deserialize)]
struct LoginBody {
    username: String,
    password: String,
    totp_code: Option<String>,
}

async fn login(State(backend): State<Shared>, Json(body): Json<LoginBody>) -> Response {
    if body.username == "locked" {
        return detail(StatusCode::LOCKED, "Account is temporarily locked");
    }
    if body.username == "tokenless" {
        return Json(json!({ "access_token": "", "token_type": "bearer" })).into_response();
    }
    if body.username != "admin" || body.password != "admin123" {
        return detail(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }
    match body.totp_code.as_deref() {
        None => (
            StatusCode::BAD_REQUEST,
            [("X-Require-TOTP", "true")],
            Json(json!({ "detail": "TOTP code required" })),
        )
            .into_response(),
        Some(TOTP_CODE) => {
            backend.tokens.lock().unwrap().insert(ADMIN_TOKEN.to_string());
            Json(json!({
                "access_token": ADMIN_TOKEN,
                "token_type": "bearer",
                "expires_in": 1800
            }))
            .into_response()
        }
        Some(_) => detail(StatusCode::UNAUTHORIZED, "Invalid TOTP code"),
    }
}

async fn me(State(backend): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(r) = backend.authorize(&headers) {
        return r;
    }
    if backend.me_fails.load(Ordering::SeqCst) {
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "database unavailable");
    }
    Json(json!({
        "id": "u-1",
        "username": "admin",
        "email": "admin@example.com",
        "role": "admin",
        "totp_enabled": backend.totp_enabled.load(Ordering::SeqCst),
        "created_at": "2024-01-01T00:00:00"
    }))
    .into_response()
}

async fn enable_2fa(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    if let Err(r) = backend.authorize(&headers) {
        return r;
    }
    if q.get("totp_code").map(String::as_str) != Some("654321") {
        return detail(StatusCode::BAD_REQUEST, "Invalid TOTP code");
    }
    backend.totp_enabled.store(true, Ordering::SeqCst);
    Json(json!({ "success": true, "message": "2FA enabled successfully" })).into_response()
}

async fn stats(State(backend): State<Shared>, headers: HeaderMap) -> Response {
    backend.stats_hits.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(50)).await;
    if let Err(r) = backend.authorize(&headers) {
        return r;
    }
    Json(json!({
        "active_sessions": 2,
        "total_connections_today": 7,
        "system_uptime": "3d 4h",
        "disk_usage_percent": 41.5,
        "memory_usage_percent": 63.0,
        "cpu_usage_percent": 12.5,
        "network_status": "online",
        "security_alerts": 0
    }))
    .into_response()
}

async fn logs(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    if let Err(r) = backend.authorize(&headers) {
        return r;
    }
    *backend.last_log_query.lock().unwrap() = q;
    Json(json!([{
        "id": "l-1",
        "timestamp": "2024-05-01T10:00:00",
        "level": "WARNING",
        "source": "AUTH_SERVICE",
        "message": "Failed login attempt"
    }]))
    .into_response()
}

async fn upload(State(backend): State<Shared>, headers: HeaderMap, mut form: Multipart) -> Response {
    if let Err(r) = backend.authorize(&headers) {
        return r;
    }
    let (mut name, mut data, mut dir) = (String::new(), Vec::new(), String::new());
    while let Some(field) = form.next_field().await.unwrap() {
        match field.name() {
            Some("file") => {
                name = field.file_name().unwrap_or_default().to_string();
                data = field.bytes().await.unwrap().to_vec();
            }
            Some("path") => dir = field.text().await.unwrap(),
            _ => {}
        }
    }
    let path = format!("{}/{}", dir.trim_end_matches('/'), name);
    let size = data.len();
    backend.uploads.lock().unwrap().push((name.clone(), data, dir));
    Json(json!({
        "name": name,
        "path": path,
        "type": "file",
        "size": size,
        "modified": "2024-05-01T10:00:00",
        "permissions": "rw-r--r--",
        "is_encrypted": true
    }))
    .into_response()
}

async fn download(
    State(backend): State<Shared>,
    headers: HeaderMap,
    UrlPath(path): UrlPath<String>,
) -> Response {
    if let Err(r) = backend.authorize(&headers) {
        return r;
    }
    let uploads = backend.uploads.lock().unwrap();
    match uploads
        .iter()
        .find(|(name, _, dir)| {
            format!("{}/{}", dir.trim_matches('/'), name) == path.trim_start_matches('/')
        })
    {
        Some((_, data, _)) => data.clone().into_response(),
        None => detail(StatusCode::NOT_FOUND, "File not found"),
    }
}

/// Concatenated bytes of the requested files, standing in for a zip archive.
async fn bulk_download(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Json(paths): Json<Vec<String>>,
) -> Response {
    if let Err(r) = backend.authorize(&headers) {
        return r;
    }
    let uploads = backend.uploads.lock().unwrap();
    let mut archive = Vec::new();
    for path in &paths {
        let found = uploads.iter().find(|(name, _, dir)| {
            format!("{}/{}", dir.trim_matches('/'), name) == path.trim_start_matches('/')
        });
        match found {
            Some((_, data, _)) => archive.extend_from_slice(data),
            None => return detail(StatusCode::NOT_FOUND, "File not found"),
        }
    }
    archive.into_response()
}

async fn delete_file(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    if let Err(r) = backend.authorize(&headers) {
        return r;
    }
    match q.get("file_path") {
        Some(_) => Json(json!({ "success": true, "message": "File deleted successfully" }))
            .into_response(),
        None => detail(StatusCode::UNPROCESSABLE_ENTITY, "file_path required"),
    }
}

pub fn router(backend: Shared) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(me))
        .route("/api/auth/enable-2fa", post(enable_2fa))
        .route("/api/dashboard/stats", get(stats))
        .route("/api/logs/", get(logs))
        .route("/api/files/upload", post(upload))
        .route("/api/files/download/{*path}", get(download))
        .route("/api/files/bulk-download", post(bulk_download))
        .route("/api/files/delete", delete(delete_file))
        .with_state(backend)
}

/// Serve the mock backend on an ephemeral port.
pub async fn spawn_backend() -> (SocketAddr, Arc<Backend>) {
    let backend = Arc::new(Backend::default());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(backend.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, backend)
}

pub struct Harness {
    pub client: Client,
    pub backend: Arc<Backend>,
    pub navigator: Arc<RecordingNavigator>,
    pub notifier: Arc<RecordingNotifier>,
    pub config: ClientConfig,
}

pub fn config_for(addr: SocketAddr, state_dir: &Path) -> ClientConfig {
    let mut config = ClientConfig::new(parse_api_url(&format!("http://{addr}/api")).unwrap());
    config.state_dir = state_dir.to_path_buf();
    config.request_timeout = Duration::from_secs(5);
    config
}

/// Client against a fresh mock backend, persisting into `state_dir`.
pub async fn harness(state_dir: &Path) -> Harness {
    let (addr, backend) = spawn_backend().await;
    let config = config_for(addr, state_dir);
    let navigator = Arc::new(RecordingNavigator::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let sessions = SessionStore::open(
        Arc::new(FileStore::new(config.session_file())),
        notifier.clone(),
    )
    .unwrap();
    let client = Client::new(&config, Arc::new(sessions), navigator.clone()).unwrap();
    Harness {
        client,
        backend,
        navigator,
        notifier,
        config,
    }
}

/// Harness already logged in as admin.
pub async fn logged_in(state_dir: &Path) -> Harness {
    let h = harness(state_dir).await;
    let outcome = h.client.login("admin", "admin123", Some(TOTP_CODE)).await;
    assert!(outcome.is_authenticated(), "login failed: {outcome:?}");
    h
}
