//! Sign-in and sign-out, with the navigation that follows them.

use std::sync::Arc;

use stockroom_client::model::{LoginRequest, User};
use stockroom_client::services::AuthService;

use super::guard::{DASHBOARD_ROUTE, LOGIN_ROUTE};
use super::navigator::Navigator;
use crate::cache::QueryCache;
use crate::error::Result;
use crate::notify::Notifier;
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AuthFlow {
    session: Arc<SessionStore>,
    navigator: Arc<Navigator>,
    auth: AuthService,
    cache: QueryCache,
    notifier: Notifier,
}

impl AuthFlow {
    pub fn new(
        session: Arc<SessionStore>,
        navigator: Arc<Navigator>,
        auth: AuthService,
        cache: QueryCache,
        notifier: Notifier,
    ) -> Self {
        Self {
            session,
            navigator,
            auth,
            cache,
            notifier,
        }
    }

    /// Sign in and land on the dashboard. On failure the user stays where
    /// they are and the error is both returned and notified.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<User> {
        match self.session.login(&self.auth, credentials).await {
            Ok(user) => {
                self.navigator.navigate(DASHBOARD_ROUTE).await;
                self.notifier
                    .success(format!("Welcome back, {}", user.display_name()));
                Ok(user)
            }
            Err(err) => {
                self.notifier.error(err.message());
                Err(err)
            }
        }
    }

    /// Sign out, forget every cached query and return to the sign-in page.
    pub async fn logout(&self) {
        self.session.logout();
        self.cache.clear().await;
        self.navigator.navigate(LOGIN_ROUTE).await;
        self.notifier.info("Signed out");
    }

    /// The signed-in user, if any.
    pub fn current_user(&self) -> Option<User> {
        self.session.user()
    }
}
