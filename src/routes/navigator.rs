//! Current location with guarded navigation.

use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use super::guard::{normalize, GuardDecision, RouteGuard, LOGIN_ROUTE};
use crate::session::SessionStore;

/// Tracks where the user is and sends every move through [`RouteGuard`].
pub struct Navigator {
    session: Arc<SessionStore>,
    location: RwLock<String>,
}

impl Navigator {
    /// Starts at the sign-in page until the first navigation.
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self {
            session,
            location: RwLock::new(LOGIN_ROUTE.to_string()),
        }
    }

    pub fn current(&self) -> String {
        self.location
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Go to `path`, waiting for hydration first.
    ///
    /// Follows at most one redirect and returns where the user ended up.
    pub async fn navigate(&self, path: &str) -> String {
        let state = self.session.wait_until_hydrated().await;

        let target = match RouteGuard::decide(&state, path) {
            GuardDecision::Allow => normalize(path).to_string(),
            GuardDecision::Redirect(to) => {
                debug!(from = path, to, "Route redirected");
                to.to_string()
            }
            // Unreachable once hydrated.
            GuardDecision::Wait => self.current(),
        };

        self.set(&target);
        target
    }

    /// Re-apply the guard to the current location, e.g. after the session
    /// expired. Returns the new location when it changed.
    pub async fn revalidate(&self) -> Option<String> {
        let current = self.current();
        let next = self.navigate(&current).await;
        (next != current).then_some(next)
    }

    fn set(&self, path: &str) {
        let mut location = self
            .location
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if *location != path {
            info!(from = %*location, to = path, "Navigated");
            *location = path.to_string();
        }
    }
}
