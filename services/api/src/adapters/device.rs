//! services/api/src/adapters/device.rs
//!
//! This module contains the host-environment adapter. It implements the
//! `DeviceEnvironment` port from the `core` crate for the machine the service
//! runs on.

use crate::config::Config;
use async_trait::async_trait;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tokio::sync::OnceCell;
use tracing::info;
use uuid::Uuid;
use wingman_core::domain::DeviceInfo;
use wingman_core::ports::{DeviceEnvironment, PortError, PortResult};

const UNKNOWN: &str = "unknown";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// Describes the local installation.
///
/// The device identifier is a random UUID written to `id_path` the first time
/// it is needed and read back on every later start, so it stays stable for
/// the lifetime of the installation.
pub struct LocalDeviceEnvironment {
    id_path: PathBuf,
    device_id: OnceCell<String>,
    device_name: String,
    device_manufacturer: String,
    country: Option<String>,
}

impl LocalDeviceEnvironment {
    pub fn new(
        id_path: PathBuf,
        device_name: String,
        device_manufacturer: String,
        locale: Option<&str>,
    ) -> Self {
        Self {
            id_path,
            device_id: OnceCell::new(),
            device_name,
            device_manufacturer,
            country: locale.and_then(country_from_locale),
        }
    }

    /// Builds the adapter from the configuration and the process locale.
    pub fn from_config(config: &Config) -> Self {
        let device_name = config
            .device_name
            .clone()
            .or_else(|| std::env::var("HOSTNAME").ok())
            .unwrap_or_else(|| UNKNOWN.to_string());
        let device_manufacturer = config
            .device_manufacturer
            .clone()
            .unwrap_or_else(|| UNKNOWN.to_string());
        let locale = std::env::var("LC_ALL")
            .ok()
            .filter(|value| !value.is_empty())
            .or_else(|| std::env::var("LANG").ok());

        Self::new(
            config.device_id_path.clone(),
            device_name,
            device_manufacturer,
            locale.as_deref(),
        )
    }

    async fn load_or_create_id(path: &Path) -> PortResult<String> {
        match tokio::fs::read_to_string(path).await {
            Ok(existing) if !existing.trim().is_empty() => return Ok(existing.trim().to_string()),
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(PortError::Unexpected(format!(
                    "Failed to read device id from {}: {}",
                    path.display(),
                    e
                )))
            }
        }

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| PortError::Unexpected(e.to_string()))?;
        }

        let device_id = Uuid::new_v4().to_string();
        tokio::fs::write(path, &device_id)
            .await
            .map_err(|e| PortError::Unexpected(format!(
                "Failed to persist device id to {}: {}",
                path.display(),
                e
            )))?;
        info!(path = %path.display(), "Generated a new device id");
        Ok(device_id)
    }
}

/// Extracts the region of a POSIX locale such as `en_US.UTF-8` or `tr-TR`.
pub fn country_from_locale(locale: &str) -> Option<String> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z]{2,3}[_-]([A-Za-z]{2})(?:[.@]|$)").expect("locale pattern is valid")
    });
    pattern
        .captures(locale.trim())
        .and_then(|captures| captures.get(1))
        .map(|region| region.as_str().to_ascii_uppercase())
}

//=========================================================================================
// `DeviceEnvironment` Trait Implementation
//=========================================================================================

#[async_trait]
impl DeviceEnvironment for LocalDeviceEnvironment {
    async fn device_info(&self) -> PortResult<DeviceInfo> {
        let device_id = self
            .device_id
            .get_or_try_init(|| Self::load_or_create_id(&self.id_path))
            .await?
            .clone();

        Ok(DeviceInfo {
            device_id,
            device_name: self.device_name.clone(),
            device_manufacturer: self.device_manufacturer.clone(),
            country: self.country.clone(),
        })
    }
}
