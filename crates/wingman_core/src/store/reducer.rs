use super::intent::{Operation, SessionIntent};
use super::state::GlobalState;
use super::Reducer;
use crate::domain::Profile;
use crate::outcome::OperationResult;

pub struct SessionReducer;

impl Reducer for SessionReducer {
    type State = GlobalState;
    type Intent = SessionIntent;

    fn reduce(mut state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            SessionIntent::Started(operation) => {
                state.in_flight += 1;
                state.loading = true;
                state.success = false;
                state.error = false;
                if operation == Operation::AnalyzeImage {
                    state.ai_response = None;
                }
            }
            SessionIntent::LoggedIn(result)
            | SessionIntent::UserFetched(result)
            | SessionIntent::ImageUploaded(result) => {
                settle(&mut state, &result);
                match result {
                    Ok(success) => {
                        state.is_authenticated = Some(true);
                        state.user = Some(success.data);
                    }
                    // A failure only resolves an unknown session; it never
                    // signs out a session that is already established.
                    Err(_) if state.is_authenticated.is_none() => {
                        state.is_authenticated = Some(false);
                    }
                    Err(_) => {}
                }
            }
            SessionIntent::Deactivated(result) => {
                settle(&mut state, &result);
                if result.is_ok() {
                    state.is_authenticated = Some(false);
                    state.user = None;
                }
            }
            SessionIntent::ActiveStatusChanged(result) => {
                settle(&mut state, &result);
                if let Ok(success) = result {
                    apply_status(&mut state, success.data);
                }
            }
            SessionIntent::ImageAnalyzed(result) => {
                settle(&mut state, &result);
                if let Ok(success) = result {
                    state.ai_response = Some(success.data);
                }
            }
            SessionIntent::Abandoned(_) => {
                state.in_flight = state.in_flight.saturating_sub(1);
                state.loading = state.in_flight > 0;
            }
            SessionIntent::LoggedOut => {
                state.is_authenticated = Some(false);
            }
        }
        state
    }
}

/// Mirrors the outcome and closes one pending phase.
fn settle<T>(state: &mut GlobalState, result: &OperationResult<T>) {
    state.in_flight = state.in_flight.saturating_sub(1);
    state.loading = state.in_flight > 0;
    state.success = result.is_ok();
    state.error = result.is_err();
    state.message = match result {
        Ok(success) => success.message.clone(),
        Err(failure) => failure.message.clone(),
    };
}

fn apply_status(state: &mut GlobalState, profile: Profile) {
    let is_current = state.user.as_ref().is_some_and(|user| user.id == profile.id);
    if !is_current {
        return;
    }
    if profile.is_active {
        state.is_authenticated = Some(true);
        state.user = Some(profile);
    } else {
        state.is_authenticated = Some(false);
        state.user = None;
    }
}
