//! services/api/src/web/state.rs
//!
//! Defines the application state shared by all handlers.

use std::sync::Arc;
use wingman_core::{Actions, Session, SessionStore};

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
///
/// The service fronts exactly one installation, so one session store is shared
/// by every request.
#[derive(Clone)]
pub struct AppState {
    pub session: Session,
}

impl AppState {
    pub fn new(actions: Actions) -> Arc<Self> {
        Arc::new(Self {
            session: Session::new(actions, SessionStore::new()),
        })
    }
}
