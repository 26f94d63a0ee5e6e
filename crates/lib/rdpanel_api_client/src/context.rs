//! Application context: the explicitly constructed owner of the session
//! store, the client and every running poll.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rdpanel_core::config::ClientConfig;
use rdpanel_core::navigation::Navigator;
use rdpanel_core::notify::Notifier;
use rdpanel_core::poll::{self, PollHandle};
use rdpanel_core::session::SessionStore;
use rdpanel_core::storage::FileStore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::client::Client;
use crate::error::ApiResult;

/// Started application: restored session, client and poll lifecycle.
#[derive(Debug)]
pub struct AppContext {
    client: Arc<Client>,
    shutdown: CancellationToken,
}

impl AppContext {
    /// Open the session file under the configured state dir, restore any
    /// persisted session and build the client.
    pub fn start(
        config: &ClientConfig,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> ApiResult<Self> {
        let store = Arc::new(FileStore::new(config.session_file()));
        let sessions = Arc::new(SessionStore::open(store, notifier)?);
        let client = Arc::new(Client::new(config, sessions.clone(), navigator)?);

        info!(
            api_url = %config.api_url,
            authenticated = sessions.is_authenticated(),
            "application context started"
        );

        Ok(Self {
            client,
            shutdown: CancellationToken::new(),
        })
    }

    pub fn client(&self) -> &Arc<Client> {
        &self.client
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        self.client.sessions()
    }

    /// Start a poll that stops with the context.
    pub fn poll<T, E, F, Fut>(&self, name: &'static str, period: Duration, fetch: F) -> PollHandle<T>
    where
        T: Send + Sync + 'static,
        E: Display + Send + 'static,
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        poll::spawn_with(self.shutdown.child_token(), name, period, fetch)
    }

    /// Cancel every poll started from this context.
    pub fn shutdown(&self) {
        if !self.shutdown.is_cancelled() {
            debug!("application context shutting down");
            self.shutdown.cancel();
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }
}

impl Drop for AppContext {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

#[cfg(test)]
mod tests {
    use rdpanel_core::navigation::NoopNavigator;
    use rdpanel_core::notify::LogNotifier;

    use super::*;

    fn config(dir: &std::path::Path) -> ClientConfig {
        let mut config = ClientConfig::new(
            rdpanel_core::config::parse_api_url("http://127.0.0.1:9/api").unwrap(),
        );
        config.state_dir = dir.to_path_buf();
        config
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn starts_unauthenticated_with_empty_state_dir() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::start(
            &config(dir.path()),
            Arc::new(NoopNavigator),
            Arc::new(LogNotifier),
        )
        .unwrap();
        assert!(!ctx.sessions().is_authenticated());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn shutdown_cancels_polls() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::start(
            &config(dir.path()),
            Arc::new(NoopNavigator),
            Arc::new(LogNotifier),
        )
        .unwrap();
        let handle = ctx.poll("idle", Duration::from_secs(60), || async {
            Ok::<_, String>(0u8)
        });
        ctx.shutdown();
        assert!(handle.is_cancelled());
        assert!(ctx.is_shut_down());
        handle.shutdown().await;
    }
}
