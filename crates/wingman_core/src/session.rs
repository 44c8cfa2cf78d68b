//! crates/wingman_core/src/session.rs
//!
//! Runs actions through the store: every call dispatches a pending intent,
//! awaits the action and dispatches the settled intent with its outcome.

use crate::actions::Actions;
use crate::domain::{InferenceResponse, Profile};
use crate::outcome::OperationResult;
use crate::store::{GlobalState, Operation, SessionIntent, SessionStore};
use std::future::Future;
use tracing::{debug, warn};

/// Closes the pending phase of an operation whose future is dropped before
/// it settles, as axum does when a client disconnects mid-request.
struct PendingGuard<'a> {
    store: &'a SessionStore,
    operation: Operation,
    settled: bool,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!(operation = ?self.operation, "Operation dropped before it settled");
            self.store.dispatch(SessionIntent::Abandoned(self.operation));
        }
    }
}

#[derive(Clone)]
pub struct Session {
    actions: Actions,
    store: SessionStore,
}

impl Session {
    pub fn new(actions: Actions, store: SessionStore) -> Self {
        Self { actions, store }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn state(&self) -> GlobalState {
        self.store.snapshot()
    }

    async fn run<T, F>(
        &self,
        operation: Operation,
        action: F,
        settled: fn(OperationResult<T>) -> SessionIntent,
    ) -> OperationResult<T>
    where
        T: Clone,
        F: Future<Output = OperationResult<T>>,
    {
        self.store.dispatch(SessionIntent::Started(operation));
        debug!(?operation, "Operation pending");
        let mut guard = PendingGuard {
            store: &self.store,
            operation,
            settled: false,
        };

        let result = action.await;

        guard.settled = true;
        debug!(?operation, success = result.is_ok(), "Operation settled");
        self.store.dispatch(settled(result.clone()));
        result
    }

    pub async fn login(&self) -> OperationResult<Profile> {
        self.run(Operation::Login, self.actions.login(), SessionIntent::LoggedIn)
            .await
    }

    pub async fn fetch_current_user(&self) -> OperationResult<Profile> {
        self.run(
            Operation::FetchCurrentUser,
            self.actions.fetch_current_user(),
            SessionIntent::UserFetched,
        )
        .await
    }

    pub async fn upload_profile_image(
        &self,
        file_name: &str,
        base64: &str,
    ) -> OperationResult<Profile> {
        self.run(
            Operation::UploadProfileImage,
            self.actions.upload_profile_image(file_name, base64),
            SessionIntent::ImageUploaded,
        )
        .await
    }

    pub async fn deactivate_profile(&self) -> OperationResult<()> {
        self.run(
            Operation::DeactivateProfile,
            self.actions.deactivate_profile(),
            SessionIntent::Deactivated,
        )
        .await
    }

    pub async fn set_active_status(
        &self,
        profile_id: i64,
        is_active: bool,
    ) -> OperationResult<Profile> {
        self.run(
            Operation::SetActiveStatus,
            self.actions.set_active_status(profile_id, is_active),
            SessionIntent::ActiveStatusChanged,
        )
        .await
    }

    pub async fn analyze_image(
        &self,
        image_base64: &str,
        prompt: &str,
    ) -> OperationResult<InferenceResponse> {
        self.run(
            Operation::AnalyzeImage,
            self.actions.analyze_image(image_base64, prompt),
            SessionIntent::ImageAnalyzed,
        )
        .await
    }

    pub fn log_out(&self) {
        self.store.dispatch(SessionIntent::LoggedOut);
    }
}
