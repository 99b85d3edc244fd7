use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::config::CacheSettings;
use crate::models::{Coordinate, Gym, NewGym};
use crate::services::{GymStore, StoreError};

/// Read-through cache in front of a gym store
///
/// Only `find_by_id` hits are cached. Gyms are immutable once created, so
/// the TTL bounds memory rather than staleness. Misses are never cached:
/// a gym created through another instance becomes visible immediately.
pub struct CachedGymStore {
    inner: Arc<dyn GymStore>,
    gyms: moka::future::Cache<String, Gym>,
}

impl CachedGymStore {
    pub fn new(inner: Arc<dyn GymStore>, capacity: u64, ttl_secs: u64) -> Self {
        let gyms = moka::future::CacheBuilder::new(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { inner, gyms }
    }

    pub fn from_settings(inner: Arc<dyn GymStore>, settings: &CacheSettings) -> Self {
        Self::new(inner, settings.gym_capacity, settings.ttl_secs)
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.gyms.entry_count(),
        }
    }

    /// Drop a cached gym
    pub async fn invalidate(&self, id: &str) {
        self.gyms.invalidate(id).await;
    }
}

#[async_trait]
impl GymStore for CachedGymStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Gym>, StoreError> {
        if let Some(gym) = self.gyms.get(id).await {
            tracing::trace!("Gym cache hit: {}", id);
            return Ok(Some(gym));
        }

        tracing::trace!("Gym cache miss: {}", id);
        let gym = self.inner.find_by_id(id).await?;
        if let Some(gym) = &gym {
            self.gyms.insert(gym.id.clone(), gym.clone()).await;
        }

        Ok(gym)
    }

    async fn create(&self, data: NewGym) -> Result<Gym, StoreError> {
        let gym = self.inner.create(data).await?;
        self.gyms.insert(gym.id.clone(), gym.clone()).await;
        Ok(gym)
    }

    async fn search_many(&self, query: &str, page: u32) -> Result<Vec<Gym>, StoreError> {
        self.inner.search_many(query, page).await
    }

    async fn find_many_nearby(&self, center: Coordinate, radius_km: f64) -> Result<Vec<Gym>, StoreError> {
        self.inner.find_many_nearby(center, radius_km).await
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::InMemoryGymStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts lookups that reach the wrapped store
    struct CountingGymStore {
        inner: InMemoryGymStore,
        lookups: AtomicUsize,
    }

    #[async_trait]
    impl GymStore for CountingGymStore {
        async fn find_by_id(&self, id: &str) -> Result<Option<Gym>, StoreError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.find_by_id(id).await
        }

        async fn create(&self, data: NewGym) -> Result<Gym, StoreError> {
            self.inner.create(data).await
        }

        async fn search_many(&self, query: &str, page: u32) -> Result<Vec<Gym>, StoreError> {
            self.inner.search_many(query, page).await
        }

        async fn find_many_nearby(&self, center: Coordinate, radius_km: f64) -> Result<Vec<Gym>, StoreError> {
            self.inner.find_many_nearby(center, radius_km).await
        }
    }

    #[tokio::test]
    async fn test_hits_are_served_from_cache() {
        let counting = Arc::new(CountingGymStore {
            inner: InMemoryGymStore::new(),
            lookups: AtomicUsize::new(0),
        });
        counting
            .inner
            .create(NewGym {
                id: Some("gym-01".to_string()),
                title: "JavaScript Gym".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let cached = CachedGymStore::new(counting.clone(), 100, 60);

        assert!(cached.find_by_id("gym-01").await.unwrap().is_some());
        assert!(cached.find_by_id("gym-01").await.unwrap().is_some());
        assert_eq!(counting.lookups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_misses_are_not_cached() {
        let counting = Arc::new(CountingGymStore {
            inner: InMemoryGymStore::new(),
            lookups: AtomicUsize::new(0),
        });
        let cached = CachedGymStore::new(counting.clone(), 100, 60);

        assert!(cached.find_by_id("gym-02").await.unwrap().is_none());
        assert!(cached.find_by_id("gym-02").await.unwrap().is_none());
        assert_eq!(counting.lookups.load(Ordering::SeqCst), 2);
    }
}
