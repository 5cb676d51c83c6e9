// Service exports
pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresClient;

use crate::core::filters::{ProfileFilter, SortOrder};
use crate::models::{NewProfile, Profile};
use thiserror::Error;

/// Errors that can occur when reading or writing profiles
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Profile not found: {0}")]
    NotFound(i64),
}

/// Backend the HTTP handlers read and write through
pub enum ProfileStore {
    Postgres(PostgresClient),
    Memory(MemoryStore),
}

impl ProfileStore {
    pub async fn create_profile(&self, profile: NewProfile) -> Result<Profile, StoreError> {
        match self {
            ProfileStore::Postgres(pg) => pg.create_profile(profile).await,
            ProfileStore::Memory(mem) => Ok(mem.create_profile(profile).await),
        }
    }

    pub async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        match self {
            ProfileStore::Postgres(pg) => pg.list_profiles().await,
            ProfileStore::Memory(mem) => Ok(mem.list_profiles().await),
        }
    }

    pub async fn filtered_profiles(
        &self,
        filter: &ProfileFilter,
        sort: SortOrder,
    ) -> Result<Vec<Profile>, StoreError> {
        match self {
            ProfileStore::Postgres(pg) => pg.filtered_profiles(filter, sort).await,
            ProfileStore::Memory(mem) => Ok(mem.filtered_profiles(filter, sort).await),
        }
    }

    /// Fetch one profile, failing with `NotFound` if it does not exist
    pub async fn get_profile(&self, id: i64) -> Result<Profile, StoreError> {
        let profile = match self {
            ProfileStore::Postgres(pg) => pg.get_profile(id).await?,
            ProfileStore::Memory(mem) => mem.get_profile(id).await,
        };
        profile.ok_or(StoreError::NotFound(id))
    }

    pub async fn count_profiles(&self) -> Result<i64, StoreError> {
        match self {
            ProfileStore::Postgres(pg) => pg.count_profiles().await,
            ProfileStore::Memory(mem) => Ok(mem.count_profiles().await),
        }
    }

    pub async fn health_check(&self) -> Result<bool, StoreError> {
        match self {
            ProfileStore::Postgres(pg) => pg.health_check().await,
            ProfileStore::Memory(_) => Ok(true),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            ProfileStore::Postgres(_) => "postgres",
            ProfileStore::Memory(_) => "memory",
        }
    }
}
