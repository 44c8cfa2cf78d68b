//! crates/wingman_core/src/store/mod.rs
//!
//! The session store: a single observable state record that only changes by
//! running an intent through a reducer.
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ observers
//!    ↑                               │
//!    └───────────────────────────────┘
//! ```

mod intent;
mod reducer;
mod state;

pub use intent::{Operation, SessionIntent};
pub use reducer::SessionReducer;
pub use state::GlobalState;

use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::watch;

/// Transforms state based on intents.
///
/// This is the only place where state transitions happen and it must stay a
/// pure function: (State, Intent) -> State.
pub trait Reducer {
    type State: Clone + PartialEq + Default + Send + Sync + 'static;
    type Intent: Send + 'static;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State;
}

/// Holds the current state and applies intents one at a time.
///
/// Every `dispatch` is one atomic transition: observers never see a
/// half-applied intent, and concurrent dispatches are serialized.
pub struct Store<R: Reducer> {
    cell: Arc<watch::Sender<R::State>>,
    _reducer: PhantomData<fn() -> R>,
}

impl<R: Reducer> Clone for Store<R> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
            _reducer: PhantomData,
        }
    }
}

impl<R: Reducer> Default for Store<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Reducer> Store<R> {
    pub fn new() -> Self {
        let (cell, _) = watch::channel(R::State::default());
        Self {
            cell: Arc::new(cell),
            _reducer: PhantomData,
        }
    }

    pub fn dispatch(&self, intent: R::Intent) {
        self.cell.send_modify(move |state| {
            let current = std::mem::take(state);
            *state = R::reduce(current, intent);
        });
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> R::State {
        self.cell.borrow().clone()
    }

    /// A receiver that is notified after every transition.
    pub fn subscribe(&self) -> watch::Receiver<R::State> {
        self.cell.subscribe()
    }
}

pub type SessionStore = Store<SessionReducer>;
