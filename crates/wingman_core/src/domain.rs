//! crates/wingman_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database driver or transport.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One application user, keyed by the installation's device identifier.
///
/// A profile is only the caller's current session while `is_active` is true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub device_id: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
    pub country: Option<String>,
    pub profile_image: Option<String>,
    pub is_active: bool,
    pub device_name: Option<String>,
    pub device_manufacturer: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// What the host environment tells us about the current installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub device_id: String,
    pub device_name: String,
    pub device_manufacturer: String,
    pub country: Option<String>,
}

/// The row inserted by a login. `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProfile {
    pub device_id: String,
    pub full_name: String,
    pub email: String,
    pub age: Option<i32>,
    pub country: Option<String>,
    pub profile_image: Option<String>,
    pub is_active: bool,
    pub device_name: String,
    pub device_manufacturer: String,
}

impl NewProfile {
    /// A fresh, active profile with empty descriptive fields.
    pub fn for_device(device: &DeviceInfo) -> Self {
        Self {
            device_id: device.device_id.clone(),
            full_name: String::new(),
            email: String::new(),
            age: None,
            country: device.country.clone(),
            profile_image: None,
            is_active: true,
            device_name: device.device_name.clone(),
            device_manufacturer: device.device_manufacturer.clone(),
        }
    }
}

/// A partial update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfilePatch {
    pub profile_image: Option<String>,
    pub is_active: Option<bool>,
}

impl ProfilePatch {
    pub fn image(url: impl Into<String>) -> Self {
        Self {
            profile_image: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn active(is_active: bool) -> Self {
        Self {
            is_active: Some(is_active),
            ..Default::default()
        }
    }
}

/// The raw body returned by the inference API, passed through unmodified.
pub type InferenceResponse = serde_json::Value;

/// Object storage path for an uploaded profile picture.
pub fn profile_image_path(file_name: &str) -> String {
    format!("profiles/{}", file_name)
}
