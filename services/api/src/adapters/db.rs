//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, the concrete implementation of
//! the `ProfileStore` port from the `core` crate. It talks to the `profiles`
//! table of the project's PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use wingman_core::domain::{NewProfile, Profile, ProfilePatch};
use wingman_core::ports::{PortError, PortResult, ProfileStore};

const PROFILE_COLUMNS: &str = "id, device_id, full_name, email, age, country, profile_image, \
     is_active, device_name, device_manufacturer, created_at";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `ProfileStore` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Fetches every row matching the query and insists on exactly one.
    async fn fetch_single(
        &self,
        query: &str,
        device_id: &str,
    ) -> PortResult<Profile> {
        let mut records = sqlx::query_as::<_, ProfileRecord>(query)
            .bind(device_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        match records.len() {
            1 => Ok(records.remove(0).to_domain()),
            0 => Err(PortError::NotFound(format!(
                "No profile for device {}",
                device_id
            ))),
            n => Err(PortError::Unexpected(format!(
                "Expected a single profile for device {}, found {}",
                device_id, n
            ))),
        }
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct ProfileRecord {
    id: i64,
    device_id: String,
    full_name: Option<String>,
    email: Option<String>,
    age: Option<i32>,
    country: Option<String>,
    profile_image: Option<String>,
    is_active: bool,
    device_name: Option<String>,
    device_manufacturer: Option<String>,
    created_at: DateTime<Utc>,
}
impl ProfileRecord {
    fn to_domain(self) -> Profile {
        Profile {
            id: self.id,
            device_id: self.device_id,
            full_name: self.full_name,
            email: self.email,
            age: self.age,
            country: self.country,
            profile_image: self.profile_image,
            is_active: self.is_active,
            device_name: self.device_name,
            device_manufacturer: self.device_manufacturer,
            created_at: self.created_at,
        }
    }
}

//=========================================================================================
// `ProfileStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl ProfileStore for DbAdapter {
    async fn insert_profile(&self, profile: &NewProfile) -> PortResult<Profile> {
        let query = format!(
            "INSERT INTO profiles (device_id, full_name, email, age, country, profile_image, \
             is_active, device_name, device_manufacturer) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {}",
            PROFILE_COLUMNS
        );
        let record = sqlx::query_as::<_, ProfileRecord>(&query)
            .bind(&profile.device_id)
            .bind(&profile.full_name)
            .bind(&profile.email)
            .bind(profile.age)
            .bind(&profile.country)
            .bind(&profile.profile_image)
            .bind(profile.is_active)
            .bind(&profile.device_name)
            .bind(&profile.device_manufacturer)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(record.to_domain())
    }

    async fn find_active_by_device(&self, device_id: &str) -> PortResult<Profile> {
        let query = format!(
            "SELECT {} FROM profiles WHERE device_id = $1 AND is_active = TRUE",
            PROFILE_COLUMNS
        );
        self.fetch_single(&query, device_id).await
    }

    async fn find_latest_by_device(&self, device_id: &str) -> PortResult<Option<Profile>> {
        let query = format!(
            "SELECT {} FROM profiles WHERE device_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT 1",
            PROFILE_COLUMNS
        );
        let record = sqlx::query_as::<_, ProfileRecord>(&query)
            .bind(device_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(record.map(ProfileRecord::to_domain))
    }

    async fn update_by_device(&self, device_id: &str, patch: &ProfilePatch) -> PortResult<u64> {
        let result = sqlx::query(
            "UPDATE profiles SET profile_image = COALESCE($1, profile_image), \
             is_active = COALESCE($2, is_active) WHERE device_id = $3",
        )
        .bind(&patch.profile_image)
        .bind(patch.is_active)
        .bind(device_id)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(result.rows_affected())
    }

    async fn update_by_id(
        &self,
        device_id: &str,
        id: i64,
        patch: &ProfilePatch,
    ) -> PortResult<Profile> {
        let query = format!(
            "UPDATE profiles SET profile_image = COALESCE($1, profile_image), \
             is_active = COALESCE($2, is_active) WHERE id = $3 AND device_id = $4 RETURNING {}",
            PROFILE_COLUMNS
        );
        let record = sqlx::query_as::<_, ProfileRecord>(&query)
            .bind(&patch.profile_image)
            .bind(patch.is_active)
            .bind(id)
            .bind(device_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => {
                    PortError::NotFound(format!("Profile {} not found for this device", id))
                }
                _ => PortError::Unexpected(e.to_string()),
            })?;
        Ok(record.to_domain())
    }
}
