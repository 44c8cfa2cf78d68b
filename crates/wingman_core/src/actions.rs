//! crates/wingman_core/src/actions.rs
//!
//! The action layer. Each operation issues one chain of remote calls through
//! the ports and folds every outcome into an [`OperationResult`]. Nothing in
//! here returns a raw port error to the caller.

use crate::domain::{
    profile_image_path, DeviceInfo, InferenceResponse, NewProfile, Profile, ProfilePatch,
};
use crate::outcome::{Failure, FailureKind, OperationResult, Success};
use crate::ports::{
    DeviceEnvironment, ImageAnalysisService, ObjectStorage, PortResult, ProfileStore,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info, warn};

//=========================================================================================
// User-facing Messages
//=========================================================================================

pub const WELCOME: &str = "Welcome buddy! Let's get it done!";
pub const CANNOT_PROCEED: &str = "Something went wrong, cannot proceed, please try again!";
/// Clients match on this exact text, typo included.
pub const CANOOT_PROCEED: &str = "Something went wrong, canoot proceed, please try again!";
pub const UPLOAD_FAILED: &str = "Something went wrong while uploading image";
pub const PROFILE_NOT_UPDATED: &str = "Profile could not be updated";
pub const PROFILE_NOT_RELOADED: &str = "Profile was updated but could not be reloaded";
pub const UPDATED: &str = "Updated";
pub const GOODBYE: &str = "Sorry to see you go!";
pub const ANALYSIS_FAILED: &str = "Something went wrong while generating a response for you!";
pub const STATUS_NOT_UPDATED: &str = "Failed to update status";

//=========================================================================================
// Login Policy
//=========================================================================================

/// What a login does when the device already owns a profile row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginPolicy {
    /// Always insert a new row. Repeated logins leave several rows per device.
    #[default]
    AppendOnly,
    /// Re-activate the device's latest row, inserting only when there is none.
    Reactivate,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown login policy '{0}', expected 'append' or 'reactivate'")]
pub struct UnknownLoginPolicy(pub String);

impl FromStr for LoginPolicy {
    type Err = UnknownLoginPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "append" => Ok(LoginPolicy::AppendOnly),
            "reactivate" | "upsert" => Ok(LoginPolicy::Reactivate),
            other => Err(UnknownLoginPolicy(other.to_string())),
        }
    }
}

//=========================================================================================
// The Action Layer
//=========================================================================================

#[derive(Clone)]
pub struct Actions {
    profiles: Arc<dyn ProfileStore>,
    storage: Arc<dyn ObjectStorage>,
    vision: Arc<dyn ImageAnalysisService>,
    device: Arc<dyn DeviceEnvironment>,
    login_policy: LoginPolicy,
}

impl Actions {
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        storage: Arc<dyn ObjectStorage>,
        vision: Arc<dyn ImageAnalysisService>,
        device: Arc<dyn DeviceEnvironment>,
    ) -> Self {
        Self {
            profiles,
            storage,
            vision,
            device,
            login_policy: LoginPolicy::default(),
        }
    }

    pub fn with_login_policy(mut self, login_policy: LoginPolicy) -> Self {
        self.login_policy = login_policy;
        self
    }

    pub fn login_policy(&self) -> LoginPolicy {
        self.login_policy
    }

    async fn resolve_device(&self, message: &str) -> Result<DeviceInfo, Failure> {
        self.device.device_info().await.map_err(|e| {
            error!("Failed to resolve device information: {:?}", e);
            Failure::new(FailureKind::Device, message)
        })
    }

    /// Creates the session's profile row for this device.
    pub async fn login(&self) -> OperationResult<Profile> {
        let device = self.resolve_device(CANNOT_PROCEED).await?;

        let stored = match self.login_policy {
            LoginPolicy::AppendOnly => {
                self.profiles
                    .insert_profile(&NewProfile::for_device(&device))
                    .await
            }
            LoginPolicy::Reactivate => self.reactivate_or_insert(&device).await,
        };

        match stored {
            Ok(profile) => {
                info!(profile_id = profile.id, "Profile logged in");
                Ok(Success::new(WELCOME, profile))
            }
            Err(e) => {
                error!("Failed to create profile: {:?}", e);
                Err(Failure::new(FailureKind::Store, CANNOT_PROCEED))
            }
        }
    }

    async fn reactivate_or_insert(&self, device: &DeviceInfo) -> PortResult<Profile> {
        match self.profiles.find_latest_by_device(&device.device_id).await? {
            Some(existing) => {
                info!(profile_id = existing.id, "Re-activating existing profile");
                self.profiles
                    .update_by_id(&device.device_id, existing.id, &ProfilePatch::active(true))
                    .await
            }
            None => {
                self.profiles
                    .insert_profile(&NewProfile::for_device(device))
                    .await
            }
        }
    }

    /// Looks up the active profile of this device.
    ///
    /// A row that comes back inactive is a soft failure with an empty message,
    /// distinct from the query itself failing.
    pub async fn fetch_current_user(&self) -> OperationResult<Profile> {
        let device = self.resolve_device(CANNOT_PROCEED).await?;

        match self.profiles.find_active_by_device(&device.device_id).await {
            Err(e) => {
                warn!("No active profile for this device: {:?}", e);
                Err(Failure::new(FailureKind::Store, CANOOT_PROCEED))
            }
            Ok(profile) if !profile.is_active => Err(Failure::new(FailureKind::Inactive, "")),
            Ok(profile) => Ok(Success::new(WELCOME, profile)),
        }
    }

    /// Stores the picture at `profiles/<file_name>`, points the profile at its
    /// public URL and returns the re-read active row.
    ///
    /// The steps run strictly in order. An object uploaded before a later step
    /// fails is left in the bucket.
    pub async fn upload_profile_image(
        &self,
        file_name: &str,
        base64: &str,
    ) -> OperationResult<Profile> {
        let device = self.resolve_device(UPLOAD_FAILED).await?;
        let path = profile_image_path(file_name);

        let contents = STANDARD.decode(base64).map_err(|e| {
            error!("Profile image is not valid base64: {:?}", e);
            Failure::new(FailureKind::Upload, UPLOAD_FAILED)
        })?;

        self.storage
            .upload(&path, Bytes::from(contents))
            .await
            .map_err(|e| {
                error!("Failed to upload {}: {:?}", path, e);
                Failure::new(FailureKind::Upload, UPLOAD_FAILED)
            })?;

        let public_url = self.storage.public_url(&path);

        self.profiles
            .update_by_device(&device.device_id, &ProfilePatch::image(public_url))
            .await
            .map_err(|e| {
                error!("Failed to point profile at {}: {:?}", path, e);
                Failure::new(FailureKind::ProfileUpdate, PROFILE_NOT_UPDATED)
            })?;

        let profile = self
            .profiles
            .find_active_by_device(&device.device_id)
            .await
            .map_err(|e| {
                error!("Profile image set but re-reading the profile failed: {:?}", e);
                Failure::new(FailureKind::Reload, PROFILE_NOT_RELOADED)
            })?;

        Ok(Success::new(UPDATED, profile))
    }

    /// Soft-deletes every profile row of this device.
    pub async fn deactivate_profile(&self) -> OperationResult<()> {
        let device = self.resolve_device(CANNOT_PROCEED).await?;

        match self
            .profiles
            .update_by_device(&device.device_id, &ProfilePatch::active(false))
            .await
        {
            Ok(rows) => {
                info!(rows, "Profile deactivated");
                Ok(Success::new(GOODBYE, ()))
            }
            Err(e) => {
                error!("Failed to deactivate profile: {:?}", e);
                Err(Failure::new(FailureKind::Store, CANOOT_PROCEED))
            }
        }
    }

    /// Flips `is_active` on one of this device's profiles. Ids owned by other
    /// devices are refused.
    pub async fn set_active_status(
        &self,
        profile_id: i64,
        is_active: bool,
    ) -> OperationResult<Profile> {
        let device = self.resolve_device(STATUS_NOT_UPDATED).await?;

        match self
            .profiles
            .update_by_id(&device.device_id, profile_id, &ProfilePatch::active(is_active))
            .await
        {
            Ok(profile) => {
                let state = if profile.is_active { "active" } else { "inactive" };
                Ok(Success::new(format!("Profile is now {}", state), profile))
            }
            Err(e) => {
                error!("Failed to toggle status of profile {}: {:?}", profile_id, e);
                Err(Failure::new(FailureKind::Store, STATUS_NOT_UPDATED))
            }
        }
    }

    /// Asks the model for an opener. The raw response is the payload; the
    /// message is the reply text when the response carries one.
    pub async fn analyze_image(
        &self,
        image_base64: &str,
        prompt: &str,
    ) -> OperationResult<InferenceResponse> {
        match self.vision.analyze_image(image_base64, prompt).await {
            Ok(response) => Ok(Success::new(reply_text(&response), response)),
            Err(e) => {
                error!("Image analysis failed: {:?}", e);
                Err(Failure::new(FailureKind::Inference, ANALYSIS_FAILED))
            }
        }
    }
}

fn reply_text(response: &InferenceResponse) -> String {
    response
        .pointer("/choices/0/message/content")
        .and_then(|content| content.as_str())
        .unwrap_or_default()
        .to_string()
}
