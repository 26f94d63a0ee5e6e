//! Client-side session store.
//!
//! Single source of truth for "is this client authenticated". The token and
//! the user snapshot are persisted under two keys that are always written and
//! cleared together. The token is opaque: nothing here checks its validity,
//! only the backend can reject it.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};

use crate::models::auth::User;
use crate::notify::{Notice, Notifier};
use crate::storage::{KeyValueStore, StorageError};

/// Storage key of the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Storage key of the serialized user profile.
pub const USER_KEY: &str = "user";

const SESSION_KEYS: [&str; 2] = [TOKEN_KEY, USER_KEY];

/// An authenticated session.
#[derive(Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
    /// Incarnation of the store this session belongs to. Bumped on every
    /// establish and clear; requests carry it so a late rejection of an old
    /// session cannot clear a newer one.
    pub epoch: u64,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("user", &self.user.username)
            .field("epoch", &self.epoch)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated,
}

#[derive(Debug, Default)]
struct Inner {
    session: Option<Session>,
    epoch: u64,
}

/// Persisted authentication state.
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
    inner: Mutex<Inner>,
}

impl SessionStore {
    /// Restore the session persisted in `store`, if any.
    ///
    /// A complete, decodable pair of keys yields an authenticated store. A
    /// lone key, an undecodable profile or an unreadable state file is cleared
    /// and the store starts unauthenticated.
    pub fn open(
        store: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, StorageError> {
        let restored = match read_pair(store.as_ref()) {
            Ok((Some(token), Some(raw_user))) if !token.is_empty() => {
                match serde_json::from_str::<User>(&raw_user) {
                    Ok(user) => Some((token, user)),
                    Err(e) => {
                        warn!(error = %e, "stored user profile unreadable, clearing session");
                        store.remove_many(&SESSION_KEYS)?;
                        None
                    }
                }
            }
            Ok((None, None)) => None,
            Ok(_) => {
                warn!("incomplete session in storage, clearing");
                store.remove_many(&SESSION_KEYS)?;
                None
            }
            Err(StorageError::Corrupt { path, source }) => {
                warn!(path = %path.display(), error = %source, "state file corrupt, clearing");
                store.remove_many(&SESSION_KEYS)?;
                None
            }
            Err(e) => return Err(e),
        };

        let mut inner = Inner::default();
        if let Some((token, user)) = restored {
            inner.epoch = 1;
            debug!(user = %user.username, "session restored");
            inner.session = Some(Session {
                token,
                user,
                epoch: inner.epoch,
            });
        }

        Ok(Self {
            store,
            notifier,
            inner: Mutex::new(inner),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Persist `token` and `user` and mark the store authenticated.
    ///
    /// A blank token is refused and leaves the store untouched.
    pub fn establish(&self, token: String, user: User) -> Result<Session, StorageError> {
        if token.trim().is_empty() {
            return Err(StorageError::EmptyToken);
        }
        let raw_user = serde_json::to_string(&user)?;
        let mut inner = self.lock();
        self.store
            .set_many(&[(TOKEN_KEY, token.as_str()), (USER_KEY, raw_user.as_str())])?;
        inner.epoch += 1;
        let session = Session {
            token,
            user,
            epoch: inner.epoch,
        };
        info!(user = %session.user.username, "session established");
        inner.session = Some(session.clone());
        Ok(session)
    }

    /// In-memory snapshot; performs no I/O.
    pub fn current(&self) -> Option<Session> {
        self.lock().session.clone()
    }

    pub fn state(&self) -> AuthState {
        if self.lock().session.is_some() {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == AuthState::Authenticated
    }

    /// Replace the user snapshot of the session identified by `epoch`.
    ///
    /// Returns `false` without touching anything when that session is gone.
    pub fn replace_user(&self, epoch: u64, user: User) -> Result<bool, StorageError> {
        let raw_user = serde_json::to_string(&user)?;
        let mut inner = self.lock();
        let Some(session) = inner.session.as_mut().filter(|s| s.epoch == epoch) else {
            return Ok(false);
        };
        self.store.set(USER_KEY, &raw_user)?;
        session.user = user;
        Ok(true)
    }

    /// Clear the session. Always succeeds; idempotent in end state.
    pub fn logout(&self) {
        let had_session = {
            let mut inner = self.lock();
            let had_session = inner.session.take().is_some();
            inner.epoch += 1;
            if let Err(e) = self.store.remove_many(&SESSION_KEYS) {
                warn!(error = %e, "failed to clear persisted session");
            }
            had_session
        };
        if had_session {
            info!("logged out");
        }
        self.notifier.notify(Notice::info("Logged out successfully"));
    }

    /// Silently clear the session identified by `epoch`.
    ///
    /// Returns `true` only for the call that actually cleared it; later calls
    /// for the same epoch, or calls for a superseded epoch, return `false`.
    pub fn invalidate(&self, epoch: u64) -> bool {
        let mut inner = self.lock();
        if !inner.session.as_ref().is_some_and(|s| s.epoch == epoch) {
            return false;
        }
        inner.session = None;
        inner.epoch += 1;
        if let Err(e) = self.store.remove_many(&SESSION_KEYS) {
            warn!(error = %e, "failed to clear persisted session");
        }
        info!("session invalidated by backend");
        true
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

fn read_pair(store: &dyn KeyValueStore) -> Result<(Option<String>, Option<String>), StorageError> {
    Ok((store.get(TOKEN_KEY)?, store.get(USER_KEY)?))
}
