use crate::domain::{InferenceResponse, Profile};
use serde::Serialize;

/// Everything the presentation layer reads about the session.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GlobalState {
    /// `None` until the first login or lookup settles.
    pub is_authenticated: Option<bool>,
    pub user: Option<Profile>,
    /// True while at least one operation is in flight.
    pub loading: bool,
    pub success: bool,
    pub error: bool,
    pub message: String,
    pub ai_response: Option<InferenceResponse>,
    #[serde(skip)]
    pub(crate) in_flight: usize,
}

impl GlobalState {
    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated == Some(true)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}
