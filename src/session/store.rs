//! The signed-in session.

use std::sync::Arc;

use stockroom_client::model::{LoginRequest, User};
use stockroom_client::services::AuthService;
use stockroom_client::{TokenProvider, UnauthorizedObserver};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::storage::{PersistedSession, SessionStorage};
use crate::error::Result;

/// Whether the persisted snapshot has been restored yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Storage not read yet. Authentication state is unknown.
    Pending,
    Hydrated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_authenticated: bool,
    /// Message of the last failed login, cleared by the next success.
    pub error: Option<String>,
}

impl SessionState {
    fn pending() -> Self {
        Self {
            phase: SessionPhase::Pending,
            user: None,
            token: None,
            is_authenticated: false,
            error: None,
        }
    }

    pub fn is_hydrated(&self) -> bool {
        self.phase == SessionPhase::Hydrated
    }

    fn has_session(&self) -> bool {
        self.is_authenticated || self.token.is_some() || self.user.is_some()
    }

    fn sign_out(&mut self) {
        self.user = None;
        self.token = None;
        self.is_authenticated = false;
    }
}

/// Session shared by the API client, the router and the console.
///
/// Starts [`SessionPhase::Pending`]; [`hydrate`](Self::hydrate) restores
/// the persisted snapshot. Registered with the API client as both token
/// source and unauthorized observer.
pub struct SessionStore {
    state: watch::Sender<SessionState>,
    storage: Arc<dyn SessionStorage>,
    key: String,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn SessionStorage>, key: impl Into<String>) -> Self {
        let (state, _) = watch::channel(SessionState::pending());
        Self {
            state,
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated
    }

    /// Restore the persisted snapshot and mark the session hydrated.
    ///
    /// An unreadable or tokenless snapshot is discarded and the session
    /// starts signed out. Calling again after hydration does nothing.
    pub fn hydrate(&self) {
        if self.state.borrow().is_hydrated() {
            return;
        }

        let restored = match self.storage.load(&self.key) {
            Ok(Some(snapshot)) if snapshot.is_usable() => Some(snapshot),
            Ok(Some(_)) => {
                debug!(key = %self.key, "Discarding persisted session without token");
                None
            }
            Ok(None) => None,
            Err(e) => {
                warn!(
                    key = %self.key,
                    error = %e,
                    "Failed to restore session, starting signed out"
                );
                if let Err(e) = self.storage.clear(&self.key) {
                    warn!(key = %self.key, error = %e, "Failed to clear unreadable session");
                }
                None
            }
        };

        self.state.send_modify(|state| {
            state.phase = SessionPhase::Hydrated;
            if let Some(snapshot) = restored {
                state.user = snapshot.user;
                state.token = snapshot.token;
                state.is_authenticated = true;
            }
        });

        let state = self.state.borrow();
        info!(
            authenticated = state.is_authenticated,
            user = state.user.as_ref().map(|u| u.email.as_str()),
            "Session hydrated"
        );
    }

    /// Resolve once the session is hydrated.
    pub async fn wait_until_hydrated(&self) -> SessionState {
        let mut rx = self.state.subscribe();
        let state = match rx.wait_for(SessionState::is_hydrated).await {
            Ok(state) => state.clone(),
            // The sender lives in `self`, so this is unreachable in practice.
            Err(_) => self.snapshot(),
        };
        state
    }

    /// Exchange credentials for a session.
    ///
    /// On success the token and user are stored and persisted. On failure the
    /// error message is recorded and any existing session is left alone.
    pub async fn login(&self, auth: &AuthService, credentials: &LoginRequest) -> Result<User> {
        match auth.login(credentials).await {
            Ok(login) => {
                let snapshot =
                    PersistedSession::authenticated(login.user.clone(), login.access_token.clone());
                if let Err(e) = self.storage.save(&self.key, &snapshot) {
                    warn!(key = %self.key, error = %e, "Failed to persist session");
                }
                self.state.send_modify(|state| {
                    state.phase = SessionPhase::Hydrated;
                    state.user = Some(login.user.clone());
                    state.token = Some(login.access_token.clone());
                    state.is_authenticated = true;
                    state.error = None;
                });
                info!(email = %login.user.email, "Signed in");
                Ok(login.user)
            }
            Err(err) => {
                let message = err.message();
                warn!(email = %credentials.email, error = %message, "Sign-in failed");
                self.state.send_modify(|state| state.error = Some(message));
                Err(err.into())
            }
        }
    }

    /// Drop the session locally and in storage.
    ///
    /// Storage is cleared even while hydration is still pending, so a
    /// signed-out user is never restored on the next start.
    pub fn logout(&self) {
        self.state.send_if_modified(|state| {
            let changed = !state.is_hydrated() || state.has_session();
            state.phase = SessionPhase::Hydrated;
            state.sign_out();
            changed
        });
        self.clear_storage();
        info!("Signed out");
    }

    /// Drop a rejected session. Returns whether anything was cleared.
    ///
    /// Before hydration no token has been sent, so a 401 then says nothing
    /// about the persisted session and is ignored.
    fn expire(&self) -> bool {
        let mut cleared = false;
        self.state.send_if_modified(|state| {
            cleared = state.is_hydrated() && state.has_session();
            if cleared {
                state.sign_out();
            }
            cleared
        });

        if cleared {
            self.clear_storage();
        }
        cleared
    }

    fn clear_storage(&self) {
        if let Err(e) = self.storage.clear(&self.key) {
            warn!(key = %self.key, error = %e, "Failed to clear persisted session");
        }
    }
}

impl TokenProvider for SessionStore {
    fn bearer_token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }
}

impl UnauthorizedObserver for SessionStore {
    fn on_unauthorized(&self, path: &str) {
        if self.expire() {
            warn!(path, "Session expired");
        } else if !self.state.borrow().is_hydrated() {
            debug!(path, "Unauthorized response before hydration ignored");
        }
    }
}
