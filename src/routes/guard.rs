//! Route access rules.

use crate::session::SessionState;

/// Sign-in page; the only public route.
pub const LOGIN_ROUTE: &str = "/login";
/// Landing page after sign-in.
pub const DASHBOARD_ROUTE: &str = "/dashboard";
/// Application root.
pub const ROOT_ROUTE: &str = "/";

/// Outcome of evaluating a route against the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// The session is still hydrating; decide later.
    Wait,
    Allow,
    Redirect(&'static str),
}

/// Access rules for the application's routes.
///
/// | Session          | `/login`              | `/`                   | other                |
/// |------------------|-----------------------|-----------------------|----------------------|
/// | pending          | wait                  | wait                  | wait                 |
/// | signed out       | allow                 | redirect `/login`     | redirect `/login`    |
/// | signed in        | redirect `/dashboard` | redirect `/dashboard` | allow                |
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteGuard;

impl RouteGuard {
    pub fn is_public(path: &str) -> bool {
        normalize(path) == LOGIN_ROUTE
    }

    pub fn decide(state: &SessionState, path: &str) -> GuardDecision {
        if !state.is_hydrated() {
            return GuardDecision::Wait;
        }

        let path = normalize(path);
        match (state.is_authenticated, path) {
            (false, LOGIN_ROUTE) => GuardDecision::Allow,
            (false, _) => GuardDecision::Redirect(LOGIN_ROUTE),
            (true, LOGIN_ROUTE) | (true, ROOT_ROUTE) => GuardDecision::Redirect(DASHBOARD_ROUTE),
            (true, _) => GuardDecision::Allow,
        }
    }
}

/// Strip query, fragment and trailing slashes: `/orders/?page=2` -> `/orders`.
pub fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        ROOT_ROUTE
    } else {
        trimmed
    }
}
