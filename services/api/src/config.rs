//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;
use wingman_core::LoginPolicy;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub log_level: Level,
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub storage_bucket: String,
    pub openai_api_key: Option<String>,
    pub vision_model: String,
    pub login_policy: LoginPolicy,
    pub device_id_path: PathBuf,
    pub device_name: Option<String>,
    pub device_manufacturer: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required =
            |key: &str| lookup(key).ok_or_else(|| ConfigError::MissingVar(key.to_string()));

        // --- Server and Database Settings ---
        let bind_address_str =
            lookup("BIND_ADDRESS").unwrap_or_else(|| "127.0.0.1:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let database_url = required("DATABASE_URL")?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Storage Bucket ---
        let supabase_url = required("SUPABASE_URL")?.trim_end_matches('/').to_string();
        let supabase_service_key = required("SUPABASE_SERVICE_KEY")?;
        let storage_bucket =
            lookup("STORAGE_BUCKET").unwrap_or_else(|| "profile-images".to_string());

        // --- Inference API ---
        let openai_api_key = lookup("OPENAI_API_KEY");
        let vision_model = lookup("VISION_MODEL").unwrap_or_else(|| "gpt-4o".to_string());

        // --- Session Settings ---
        let login_policy = match lookup("LOGIN_POLICY") {
            Some(value) => value.parse::<LoginPolicy>().map_err(|e| {
                ConfigError::InvalidValue("LOGIN_POLICY".to_string(), e.to_string())
            })?,
            None => LoginPolicy::default(),
        };

        // --- Host Environment ---
        let device_id_path = lookup("DEVICE_ID_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./.wingman/device_id"));
        let device_name = lookup("DEVICE_NAME");
        let device_manufacturer = lookup("DEVICE_MANUFACTURER");

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            supabase_url,
            supabase_service_key,
            storage_bucket,
            openai_api_key,
            vision_model,
            login_policy,
            device_id_path,
            device_name,
            device_manufacturer,
        })
    }
}
