//! crates/wingman_core/src/outcome.rs
//!
//! The normalized outcome every action returns, and the `{success, message, data}`
//! envelope the presentation layer reads.

use serde::Serialize;

/// Which step of an action gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The host environment could not describe the device.
    Device,
    /// The profiles table rejected or could not answer the query.
    Store,
    /// The query succeeded but the matching profile is deactivated.
    Inactive,
    /// Decoding or writing the image to the bucket failed.
    Upload,
    /// The profile row could not be pointed at the uploaded image.
    ProfileUpdate,
    /// The profile was updated but re-reading it failed.
    Reload,
    /// The inference API call failed.
    Inference,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Success<T> {
    pub message: String,
    pub data: T,
}

impl<T> Success<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }
}

/// Either the payload with a message, or the step that failed with a message.
pub type OperationResult<T> = Result<Success<T>, Failure>;

/// The wire shape of an [`OperationResult`]. `data` is only present on success.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> From<OperationResult<T>> for Envelope<T> {
    fn from(result: OperationResult<T>) -> Self {
        match result {
            Ok(success) => Envelope {
                success: true,
                message: success.message,
                data: Some(success.data),
            },
            Err(failure) => Envelope {
                success: false,
                message: failure.message,
                data: None,
            },
        }
    }
}
