use crate::domain::{InferenceResponse, Profile};
use crate::outcome::OperationResult;

/// The operations that go through a pending phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Login,
    FetchCurrentUser,
    UploadProfileImage,
    DeactivateProfile,
    SetActiveStatus,
    AnalyzeImage,
}

#[derive(Debug, Clone)]
pub enum SessionIntent {
    /// An operation was issued and has not settled yet.
    Started(Operation),
    LoggedIn(OperationResult<Profile>),
    UserFetched(OperationResult<Profile>),
    ImageUploaded(OperationResult<Profile>),
    Deactivated(OperationResult<()>),
    ActiveStatusChanged(OperationResult<Profile>),
    ImageAnalyzed(OperationResult<InferenceResponse>),
    /// The caller went away before the operation settled.
    Abandoned(Operation),
    /// Local sign-out. No remote call is involved.
    LoggedOut,
}
