//! services/api/src/adapters/storage.rs
//!
//! This module contains the adapter for the Supabase storage bucket that holds
//! profile pictures. It implements the `ObjectStorage` port from the `core` crate.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header::CONTENT_TYPE, StatusCode};
use tracing::debug;
use wingman_core::ports::{ObjectStorage, PortError, PortResult};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `ObjectStorage` against the Supabase Storage REST API.
#[derive(Clone)]
pub struct SupabaseStorageAdapter {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
    bucket: String,
}

impl SupabaseStorageAdapter {
    /// Creates a new `SupabaseStorageAdapter`.
    pub fn new(base_url: String, service_key: String, bucket: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key,
            bucket,
        }
    }

    fn object_url(&self, path: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, path)
    }
}

/// Guesses the content type from the file extension; the bucket serves it back verbatim.
fn content_type_for(path: &str) -> &'static str {
    let extension = path.rsplit('.').next().unwrap_or_default().to_ascii_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        _ => "application/octet-stream",
    }
}

//=========================================================================================
// `ObjectStorage` Trait Implementation
//=========================================================================================

#[async_trait]
impl ObjectStorage for SupabaseStorageAdapter {
    async fn upload(&self, path: &str, contents: Bytes) -> PortResult<()> {
        debug!(path, size = contents.len(), "Uploading object");

        let response = self
            .http
            .post(self.object_url(path))
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .header(CONTENT_TYPE, content_type_for(path))
            .body(contents)
            .send()
            .await
            .map_err(|e| PortError::Unexpected(format!("Storage request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(PortError::Unauthorized),
            StatusCode::NOT_FOUND => Err(PortError::NotFound(format!(
                "Bucket {} not found: {}",
                self.bucket, body
            ))),
            _ => Err(PortError::Unexpected(format!(
                "Storage returned {}: {}",
                status, body
            ))),
        }
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, path
        )
    }
}
