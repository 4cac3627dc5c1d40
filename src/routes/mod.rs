//! Route guarding and navigation.
//!
//! Routes are plain paths. `/login` is public; everything else requires a
//! session. Nothing is decided while the session is still hydrating.

mod flow;
mod guard;
mod navigator;

pub use flow::AuthFlow;
pub use guard::{normalize, GuardDecision, RouteGuard, DASHBOARD_ROUTE, LOGIN_ROUTE, ROOT_ROUTE};
pub use navigator::Navigator;
