//! In-memory ports and an app builder shared by the integration tests.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use wingman_api::web::{self, AppState};
use wingman_core::{
    Actions, DeviceEnvironment, DeviceInfo, ImageAnalysisService, InferenceResponse, LoginPolicy,
    NewProfile, ObjectStorage, PortError, PortResult, Profile, ProfilePatch, ProfileStore,
};

pub const DEVICE_ID: &str = "3f1c9a7e-test-device";

#[derive(Default)]
pub struct MemoryProfiles {
    rows: Mutex<Vec<Profile>>,
}

impl MemoryProfiles {
    #[allow(dead_code)]
    pub fn count_for(&self, device_id: &str) -> usize {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.device_id == device_id)
            .count()
    }

    fn matching(&self, device_id: &str, active_only: bool) -> Vec<Profile> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.device_id == device_id && (!active_only || p.is_active))
            .cloned()
            .collect()
    }

    fn single(mut rows: Vec<Profile>) -> PortResult<Profile> {
        if rows.len() == 1 {
            Ok(rows.remove(0))
        } else {
            Err(PortError::Unexpected(format!("expected one row, found {}", rows.len())))
        }
    }
}

fn apply(row: &mut Profile, patch: &ProfilePatch) {
    if let Some(url) = &patch.profile_image {
        row.profile_image = Some(url.clone());
    }
    if let Some(active) = patch.is_active {
        row.is_active = active;
    }
}

#[async_trait]
impl ProfileStore for MemoryProfiles {
    async fn insert_profile(&self, profile: &NewProfile) -> PortResult<Profile> {
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
        Self::single(self.matching(device_id, true))
    }

    async fn find_latest_by_device(&self, device_id: &str) -> PortResult<Option<Profile>> {
        Ok(self.matching(device_id, false).into_iter().max_by_key(|p| p.id))
    }

    async fn update_by_device(&self, device_id: &str, patch: &ProfilePatch) -> PortResult<u64> {
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
    objects: Mutex<HashMap<String, Bytes>>,
}

#[async_trait]
impl ObjectStorage for MemoryBucket {
    async fn upload(&self, path: &str, contents: Bytes) -> PortResult<()> {
        self.objects.lock().unwrap().insert(path.to_string(), contents);
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "https://project.supabase.co/storage/v1/object/public/profile-images/{}",
            path
        )
    }
}

/// Answers with a canned completion, or fails like a dropped connection.
pub struct ScriptedVision {
    pub offline: AtomicBool,
}

#[async_trait]
impl ImageAnalysisService for ScriptedVision {
    async fn analyze_image(
        &self,
        _image_base64: &str,
        prompt: &str,
    ) -> PortResult<InferenceResponse> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(PortError::Unexpected("error sending request".to_string()));
        }
        Ok(json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": format!("Opener for: {}", prompt) },
                "finish_reason": "stop"
            }]
        }))
    }
}

pub struct TestDevice;

#[async_trait]
impl DeviceEnvironment for TestDevice {
    async fn device_info(&self) -> PortResult<DeviceInfo> {
        Ok(DeviceInfo {
            device_id: DEVICE_ID.to_string(),
            device_name: "Test Phone".to_string(),
            device_manufacturer: "Acme".to_string(),
            country: Some("TR".to_string()),
        })
    }
}

/// Handles the tests poke at after driving the router.
#[allow(dead_code)]
pub struct TestApp {
    pub router: axum::Router,
    pub profiles: Arc<MemoryProfiles>,
    pub vision: Arc<ScriptedVision>,
    pub state: Arc<AppState>,
}

/// Create a test app backed entirely by in-memory ports.
#[allow(dead_code)]
pub fn create_test_app(policy: LoginPolicy) -> TestApp {
    let profiles = Arc::new(MemoryProfiles::default());
    let vision = Arc::new(ScriptedVision {
        offline: AtomicBool::new(false),
    });
    let actions = Actions::new(
        profiles.clone(),
        Arc::new(MemoryBucket::default()),
        vision.clone(),
        Arc::new(TestDevice),
    )
    .with_login_policy(policy);
    let state = AppState::new(actions);

    TestApp {
        router: web::router(state.clone()),
        profiles,
        vision,
        state,
    }
}

/// Reads a JSON response body.
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
