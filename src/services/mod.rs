// Store abstractions and implementations
pub mod cache;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use crate::models::{CheckIn, Coordinate, Gym, NewCheckIn, NewGym};

pub use cache::CachedGymStore;
pub use memory::{InMemoryCheckInStore, InMemoryGymStore};
pub use postgres::{PostgresCheckInStore, PostgresGymStore, PostgresPool};

/// Default number of records per page
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Errors raised by gym and check-in stores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// Gyms are immutable once created; their id cannot be registered twice
    #[error("Gym {0} already exists")]
    DuplicateGym(String),

    /// The store already holds a check-in for this user on this day
    #[error("Duplicate check-in for user {user_id} on {day}")]
    DuplicateCheckIn { user_id: String, day: NaiveDate },

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

/// Read/write access to gyms
#[async_trait]
pub trait GymStore: Send + Sync {
    /// Returns `Ok(None)` when no gym has this id
    async fn find_by_id(&self, id: &str) -> Result<Option<Gym>, StoreError>;

    /// Fails with [`StoreError::DuplicateGym`] if the id is taken
    async fn create(&self, data: NewGym) -> Result<Gym, StoreError>;

    /// Case-insensitive title search, 1-based pages
    async fn search_many(&self, query: &str, page: u32) -> Result<Vec<Gym>, StoreError>;

    /// Gyms whose great-circle distance from `center` is at most `radius_km`
    async fn find_many_nearby(&self, center: Coordinate, radius_km: f64) -> Result<Vec<Gym>, StoreError>;
}

/// Read/write access to check-ins
///
/// `create` must refuse a second check-in for the same user on the same
/// UTC day with [`StoreError::DuplicateCheckIn`], atomically with respect
/// to concurrent `create` calls.
#[async_trait]
pub trait CheckInStore: Send + Sync {
    async fn create(&self, data: NewCheckIn) -> Result<CheckIn, StoreError>;

    /// The user's check-in created on the calendar day of `date`, if any
    async fn find_by_user_id_on_date(
        &self,
        user_id: &str,
        date: DateTime<Utc>,
    ) -> Result<Option<CheckIn>, StoreError>;

    /// Newest first, 1-based pages
    async fn find_many_by_user_id(&self, user_id: &str, page: u32) -> Result<Vec<CheckIn>, StoreError>;

    async fn count_by_user_id(&self, user_id: &str) -> Result<u64, StoreError>;
}

/// Offset of a 1-based page; page 0 is treated as page 1
pub(crate) fn page_offset(page: u32, page_size: u32) -> usize {
    (page.max(1) as usize - 1) * page_size as usize
}
