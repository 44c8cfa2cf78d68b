pub mod actions;
pub mod domain;
pub mod outcome;
pub mod ports;
pub mod session;
pub mod store;

#[cfg(test)]
mod fakes;

pub use actions::{Actions, LoginPolicy};
pub use domain::{DeviceInfo, InferenceResponse, NewProfile, Profile, ProfilePatch};
pub use outcome::{Envelope, Failure, FailureKind, OperationResult, Success};
pub use ports::{
    DeviceEnvironment, ImageAnalysisService, ObjectStorage, PortError, PortResult, ProfileStore,
};
pub use session::Session;
pub use store::{GlobalState, SessionStore};
