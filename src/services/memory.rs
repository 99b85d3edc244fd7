use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::GymSettings;
use crate::core::clock::{day_window, is_same_day};
use crate::core::distance::{calculate_bounding_box, distance_between_coordinates, is_within_bounding_box};
use crate::models::{CheckIn, Coordinate, Gym, NewCheckIn, NewGym};
use crate::services::{page_offset, CheckInStore, GymStore, StoreError, DEFAULT_PAGE_SIZE};

/// Deterministic gym store kept in process memory
#[derive(Debug)]
pub struct InMemoryGymStore {
    gyms: RwLock<Vec<Gym>>,
    page_size: u32,
}

impl InMemoryGymStore {
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            gyms: RwLock::new(Vec::new()),
            page_size: page_size.max(1),
        }
    }

    pub fn from_settings(settings: &GymSettings) -> Self {
        Self::with_page_size(settings.page_size)
    }
}

impl Default for InMemoryGymStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GymStore for InMemoryGymStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Gym>, StoreError> {
        let gyms = self.gyms.read().await;
        Ok(gyms.iter().find(|gym| gym.id == id).cloned())
    }

    async fn create(&self, data: NewGym) -> Result<Gym, StoreError> {
        let gym = Gym {
            id: data.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            title: data.title,
            description: data.description,
            phone: data.phone,
            latitude: data.latitude,
            longitude: data.longitude,
        };

        let mut gyms = self.gyms.write().await;
        if gyms.iter().any(|existing| existing.id == gym.id) {
            return Err(StoreError::DuplicateGym(gym.id));
        }
        gyms.push(gym.clone());

        tracing::debug!("Stored gym {} ({})", gym.id, gym.title);
        Ok(gym)
    }

    async fn search_many(&self, query: &str, page: u32) -> Result<Vec<Gym>, StoreError> {
        let needle = query.to_lowercase();
        let gyms = self.gyms.read().await;

        Ok(gyms
            .iter()
            .filter(|gym| gym.title.to_lowercase().contains(&needle))
            .skip(page_offset(page, self.page_size))
            .take(self.page_size as usize)
            .cloned()
            .collect())
    }

    async fn find_many_nearby(&self, center: Coordinate, radius_km: f64) -> Result<Vec<Gym>, StoreError> {
        let bbox = calculate_bounding_box(center, radius_km);
        let gyms = self.gyms.read().await;

        Ok(gyms
            .iter()
            // Stage 1: cheap bounding box pre-filter
            .filter(|gym| is_within_bounding_box(gym.coordinate(), &bbox))
            // Stage 2: exact great-circle distance
            .filter(|gym| distance_between_coordinates(center, gym.coordinate()) <= radius_km)
            .cloned()
            .collect())
    }
}

/// Deterministic check-in store kept in process memory
///
/// `create` checks the per-user daily limit and appends under one write
/// lock, so concurrent requests for the same user cannot both succeed.
#[derive(Debug)]
pub struct InMemoryCheckInStore {
    check_ins: RwLock<Vec<CheckIn>>,
    page_size: u32,
}

impl InMemoryCheckInStore {
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            check_ins: RwLock::new(Vec::new()),
            page_size: page_size.max(1),
        }
    }

    pub fn from_settings(settings: &GymSettings) -> Self {
        Self::with_page_size(settings.page_size)
    }

    /// Number of stored check-ins across all users
    pub async fn len(&self) -> usize {
        self.check_ins.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.check_ins.read().await.is_empty()
    }
}

impl Default for InMemoryCheckInStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CheckInStore for InMemoryCheckInStore {
    async fn create(&self, data: NewCheckIn) -> Result<CheckIn, StoreError> {
        let mut check_ins = self.check_ins.write().await;

        let duplicate = check_ins
            .iter()
            .any(|existing| existing.user_id == data.user_id && is_same_day(data.created_at, existing.created_at));
        if duplicate {
            return Err(StoreError::DuplicateCheckIn {
                user_id: data.user_id,
                day: data.created_at.date_naive(),
            });
        }

        let check_in = CheckIn {
            id: Uuid::new_v4().to_string(),
            gym_id: data.gym_id,
            user_id: data.user_id,
            created_at: data.created_at,
            validated_at: None,
        };
        check_ins.push(check_in.clone());

        Ok(check_in)
    }

    async fn find_by_user_id_on_date(
        &self,
        user_id: &str,
        date: DateTime<Utc>,
    ) -> Result<Option<CheckIn>, StoreError> {
        let (start_of_day, next_day) = day_window(date);
        let check_ins = self.check_ins.read().await;

        Ok(check_ins
            .iter()
            .find(|check_in| {
                check_in.user_id == user_id
                    && check_in.created_at >= start_of_day
                    && check_in.created_at < next_day
            })
            .cloned())
    }

    async fn find_many_by_user_id(&self, user_id: &str, page: u32) -> Result<Vec<CheckIn>, StoreError> {
        let check_ins = self.check_ins.read().await;

        let mut owned: Vec<CheckIn> = check_ins
            .iter()
            .filter(|check_in| check_in.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(owned
            .into_iter()
            .skip(page_offset(page, self.page_size))
            .take(self.page_size as usize)
            .collect())
    }

    async fn count_by_user_id(&self, user_id: &str) -> Result<u64, StoreError> {
        let check_ins = self.check_ins.read().await;
        Ok(check_ins.iter().filter(|check_in| check_in.user_id == user_id).count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn gym(id: &str, title: &str, lat: f64, lon: f64) -> NewGym {
        NewGym {
            id: Some(id.to_string()),
            title: title.to_string(),
            latitude: lat,
            longitude: lon,
            ..Default::default()
        }
    }

    fn check_in(user_id: &str, at: DateTime<Utc>) -> NewCheckIn {
        NewCheckIn {
            user_id: user_id.to_string(),
            gym_id: "gym-01".to_string(),
            created_at: at,
        }
    }

    #[tokio::test]
    async fn test_find_by_id_returns_none_when_absent() {
        let store = InMemoryGymStore::new();
        store.create(gym("gym-01", "JavaScript Gym", -22.782011, -47.2826153)).await.unwrap();

        assert!(store.find_by_id("gym-01").await.unwrap().is_some());
        assert!(store.find_by_id("gym-02").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_existing_gym_id() {
        let store = InMemoryGymStore::new();
        store.create(gym("gym-01", "JavaScript Gym", -22.782011, -47.2826153)).await.unwrap();

        let err = store.create(gym("gym-01", "Renamed Gym", 0.0, 0.0)).await.unwrap_err();

        assert!(matches!(err, StoreError::DuplicateGym(ref id) if id == "gym-01"));
        let stored = store.find_by_id("gym-01").await.unwrap().unwrap();
        assert_eq!(stored.title, "JavaScript Gym");
        assert_eq!(stored.latitude, -22.782011);
    }

    #[tokio::test]
    async fn test_nearby_search_wraps_the_antimeridian() {
        let store = InMemoryGymStore::new();
        store.create(gym("east", "East Gym", 0.0, 179.99)).await.unwrap();
        store.create(gym("west", "West Gym", 0.0, -179.99)).await.unwrap();
        store.create(gym("far", "Far Gym", 0.0, 170.0)).await.unwrap();

        let mut ids: Vec<String> = store
            .find_many_nearby(Coordinate::new(0.0, 179.99), 10.0)
            .await
            .unwrap()
            .into_iter()
            .map(|gym| gym.id)
            .collect();
        ids.sort();

        assert_eq!(ids, vec!["east".to_string(), "west".to_string()]);
    }

    #[tokio::test]
    async fn test_from_settings_uses_page_size() {
        let settings = GymSettings { nearby_radius_km: 10.0, page_size: 1 };
        let store = InMemoryGymStore::from_settings(&settings);
        store.create(gym("gym-01", "Rust Gym", 0.0, 0.0)).await.unwrap();
        store.create(gym("gym-02", "Rust Gym", 0.0, 0.0)).await.unwrap();

        assert_eq!(store.search_many("rust", 1).await.unwrap().len(), 1);

        let check_ins = InMemoryCheckInStore::from_settings(&settings);
        let start = Utc.with_ymd_and_hms(2022, 1, 20, 8, 0, 0).unwrap();
        check_ins.create(check_in("user-01", start)).await.unwrap();
        check_ins.create(check_in("user-01", start + Duration::days(1))).await.unwrap();

        assert_eq!(check_ins.find_many_by_user_id("user-01", 2).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_guard_covers_last_instant_of_day() {
        let store = InMemoryCheckInStore::new();
        let late = Utc.with_ymd_and_hms(2022, 1, 20, 23, 59, 59).unwrap() + Duration::microseconds(999_500);

        store.create(check_in("user-01", late)).await.unwrap();
        let err = store.create(check_in("user-01", late + Duration::microseconds(100))).await.unwrap_err();

        assert!(matches!(err, StoreError::DuplicateCheckIn { .. }));
        assert!(store.find_by_user_id_on_date("user-01", late).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_and_paginated() {
        let store = InMemoryGymStore::with_page_size(2);
        for i in 1..=3 {
            store.create(gym(&format!("gym-{i}"), &format!("Rust Gym {i}"), 0.0, 0.0)).await.unwrap();
        }
        store.create(gym("other", "TypeScript Gym", 0.0, 0.0)).await.unwrap();

        let first = store.search_many("rust", 1).await.unwrap();
        let second = store.search_many("RUST", 2).await.unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].id, "gym-3");
    }

    #[tokio::test]
    async fn test_create_rejects_second_check_in_same_day() {
        let store = InMemoryCheckInStore::new();
        let morning = Utc.with_ymd_and_hms(2022, 1, 20, 8, 0, 0).unwrap();

        store.create(check_in("user-01", morning)).await.unwrap();
        let err = store.create(check_in("user-01", morning + Duration::hours(10))).await.unwrap_err();

        assert!(matches!(err, StoreError::DuplicateCheckIn { .. }));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_find_by_user_id_on_date_scopes_to_user_and_day() {
        let store = InMemoryCheckInStore::new();
        let day = Utc.with_ymd_and_hms(2022, 1, 20, 8, 0, 0).unwrap();
        store.create(check_in("user-01", day)).await.unwrap();

        assert!(store.find_by_user_id_on_date("user-01", day).await.unwrap().is_some());
        assert!(store.find_by_user_id_on_date("user-02", day).await.unwrap().is_none());
        assert!(store
            .find_by_user_id_on_date("user-01", day + Duration::days(1))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_history_is_newest_first() {
        let store = InMemoryCheckInStore::with_page_size(2);
        let start = Utc.with_ymd_and_hms(2022, 1, 20, 8, 0, 0).unwrap();
        for day in 0..3 {
            store.create(check_in("user-01", start + Duration::days(day))).await.unwrap();
        }

        let page = store.find_many_by_user_id("user-01", 1).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].created_at, start + Duration::days(2));
        assert_eq!(store.count_by_user_id("user-01").await.unwrap(), 3);
    }
}
