//! crates/wingman_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, keeping the
//! action layer independent of the concrete store, bucket and model API.

use crate::domain::{DeviceInfo, InferenceResponse, NewProfile, Profile, ProfilePatch};
use async_trait::async_trait;
use bytes::Bytes;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The `profiles` table.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Inserts one row and returns it as stored.
    async fn insert_profile(&self, profile: &NewProfile) -> PortResult<Profile>;

    /// Returns the single active row for a device. Zero or several matches are errors.
    async fn find_active_by_device(&self, device_id: &str) -> PortResult<Profile>;

    /// Returns the most recently created row for a device, if any.
    async fn find_latest_by_device(&self, device_id: &str) -> PortResult<Option<Profile>>;

    /// Applies the patch to every row of the device and returns the number of rows touched.
    async fn update_by_device(&self, device_id: &str, patch: &ProfilePatch) -> PortResult<u64>;

    /// Applies the patch to one row, provided it belongs to `device_id`. A row
    /// owned by another device is reported as `NotFound`.
    async fn update_by_id(
        &self,
        device_id: &str,
        id: i64,
        patch: &ProfilePatch,
    ) -> PortResult<Profile>;
}

/// A public object storage bucket.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Writes `contents` at `path` inside the bucket.
    async fn upload(&self, path: &str, contents: Bytes) -> PortResult<()>;

    /// The public URL under which `path` is served. Never touches the network.
    fn public_url(&self, path: &str) -> String;
}

#[async_trait]
pub trait ImageAnalysisService: Send + Sync {
    /// Sends one image plus a prompt to the model and returns the raw response body.
    async fn analyze_image(&self, image_base64: &str, prompt: &str)
        -> PortResult<InferenceResponse>;
}

/// Accessors for the host the application runs on.
#[async_trait]
pub trait DeviceEnvironment: Send + Sync {
    async fn device_info(&self) -> PortResult<DeviceInfo>;
}
