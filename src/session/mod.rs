//! Session state and its persistence.
//!
//! # Lifecycle
//!
//! ```text
//! Pending --hydrate--> Hydrated(signed out | signed in)
//! Pending --login ok--> Hydrated(signed in)
//! Pending --logout--> Hydrated(signed out)
//!                        signed out --login ok--> signed in
//!                        signed in  --logout | 401--> signed out
//! ```
//!
//! A failed login records an error and leaves the current session as it was.
//! A 401 on any authenticated request clears the session and its persisted
//! snapshot before the failing call returns. A 401 while pending is ignored,
//! since no token has been sent yet.

mod storage;
mod store;

pub use storage::{FileSessionStorage, MemorySessionStorage, PersistedSession, SessionStorage};
pub use store::{SessionPhase, SessionState, SessionStore};
