//! In-memory port implementations for the unit tests of this crate.

use crate::domain::{DeviceInfo, InferenceResponse, NewProfile, Profile, ProfilePatch};
use crate::ports::{
    DeviceEnvironment, ImageAnalysisService, ObjectStorage, PortError, PortResult, ProfileStore,
};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tokio::sync::oneshot;

pub const DEVICE_ID: &str = "device-1";

fn apply(profile: &mut Profile, patch: &ProfilePatch) {
    if let Some(url) = &patch.profile_image {
        profile.profile_image = Some(url.clone());
    }
    if let Some(active) = patch.is_active {
        profile.is_active = active;
    }
}

#[derive(Default)]
pub struct MemoryProfiles {
    pub rows: Mutex<Vec<Profile>>,
    pub fail_writes: AtomicBool,
    pub fail_reads: AtomicBool,
    /// Makes the active lookup hand back the device's row without checking
    /// `is_active`, like a stale read replica.
    pub ignore_active_filter: AtomicBool,
}

impl MemoryProfiles {
    pub fn rows_for(&self, device_id: &str) -> Vec<Profile> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.device_id == device_id)
            .cloned()
            .collect()
    }

    fn check_writes(&self) -> PortResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PortError::Unexpected("write refused".to_string()));
        }
        Ok(())
    }

    fn check_reads(&self) -> PortResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(PortError::Unexpected("read refused".to_string()));
        }
        Ok(())
    }

    fn single(&self, matches: Vec<Profile>, device_id: &str) -> PortResult<Profile> {
        match matches.len() {
            1 => Ok(matches.into_iter().next().unwrap()),
            0 => Err(PortError::NotFound(format!("No profile for device {}", device_id))),
            n => Err(PortError::Unexpected(format!("{} profiles for device {}", n, device_id))),
        }
    }
}

#[async_trait]
impl ProfileStore for MemoryProfiles {
    async fn insert_profile(&self, profile: &NewProfile) -> PortResult<Profile> {
        self.check_writes()?;
        let mut rows = self.rows.lock().unwrap();
        let row = Profile {
            id: rows.len() as i64 + 1,
            device_id: profile.device_id.clone(),
            full_name: Some(profile.full_name.clone()),
            email: Some(profile.email.clone()),
            age: profile.age,
            country: profile.country.clone(),
            profile_image: profile.profile_image.clone(),
            is_active: profile.is_active,
            device_name: Some(profile.device_name.clone()),
            device_manufacturer: Some(profile.device_manufacturer.clone()),
            created_at: Utc::now(),
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn find_active_by_device(&self, device_id: &str) -> PortResult<Profile> {
        self.check_reads()?;
        let any_state = self.ignore_active_filter.load(Ordering::SeqCst);
        let matches = self
            .rows_for(device_id)
            .into_iter()
            .filter(|p| any_state || p.is_active)
            .collect();
        self.single(matches, device_id)
    }

    async fn find_latest_by_device(&self, device_id: &str) -> PortResult<Option<Profile>> {
        self.check_reads()?;
        Ok(self.rows_for(device_id).into_iter().max_by_key(|p| p.id))
    }

    async fn update_by_device(&self, device_id: &str, patch: &ProfilePatch) -> PortResult<u64> {
        self.check_writes()?;
        let mut rows = self.rows.lock().unwrap();
        let mut touched = 0;
        for row in rows.iter_mut().filter(|p| p.device_id == device_id) {
            apply(row, patch);
            touched += 1;
        }
        Ok(touched)
    }

    async fn update_by_id(
        &self,
        device_id: &str,
        id: i64,
        patch: &ProfilePatch,
    ) -> PortResult<Profile> {
        self.check_writes()?;
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|p| p.id == id && p.device_id == device_id)
            .ok_or_else(|| PortError::NotFound(format!("Profile {} not found", id)))?;
        apply(row, patch);
        Ok(row.clone())
    }
}

#[derive(Default)]
pub struct MemoryBucket {
    pub objects: Mutex<HashMap<String, Bytes>>,
    pub fail: AtomicBool,
}

#[async_trait]
impl ObjectStorage for MemoryBucket {
    async fn upload(&self, path: &str, contents: Bytes) -> PortResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(PortError::Unauthorized);
        }
        self.objects.lock().unwrap().insert(path.to_string(), contents);
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("https://cdn.test/profile-images/{}", path)
    }
}

pub struct CannedVision {
    pub response: Option<InferenceResponse>,
}

#[async_trait]
impl ImageAnalysisService for CannedVision {
    async fn analyze_image(
        &self,
        _image_base64: &str,
        _prompt: &str,
    ) -> PortResult<InferenceResponse> {
        self.response
            .clone()
            .ok_or_else(|| PortError::Unexpected("connection reset by peer".to_string()))
    }
}

/// Holds every call until the paired sender fires (or is dropped).
pub struct GatedVision {
    gate: Mutex<Option<oneshot::Receiver<()>>>,
    response: InferenceResponse,
}

impl GatedVision {
    pub fn new(gate: oneshot::Receiver<()>, response: InferenceResponse) -> Self {
        Self {
            gate: Mutex::new(Some(gate)),
            response,
        }
    }
}

#[async_trait]
impl ImageAnalysisService for GatedVision {
    async fn analyze_image(
        &self,
        _image_base64: &str,
        _prompt: &str,
    ) -> PortResult<InferenceResponse> {
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        Ok(self.response.clone())
    }
}

pub struct FixedDevice {
    pub info: Option<DeviceInfo>,
}

impl FixedDevice {
    pub fn phone() -> Self {
        Self {
            info: Some(DeviceInfo {
                device_id: DEVICE_ID.to_string(),
                device_name: "Pixel".to_string(),
                device_manufacturer: "Google".to_string(),
                country: Some("TR".to_string()),
            }),
        }
    }
}

#[async_trait]
impl DeviceEnvironment for FixedDevice {
    async fn device_info(&self) -> PortResult<DeviceInfo> {
        self.info
            .clone()
            .ok_or_else(|| PortError::Unexpected("no device id".to_string()))
    }
}
