use std::sync::Arc;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::config::GymSettings;
use crate::models::{Coordinate, CreateGymRequest, GymResponse, GymsResponse, NearbyGymsRequest, NewGym, SearchGymsRequest};
use crate::services::{GymStore, StoreError};

/// Default radius for nearby gym lookups
pub const NEARBY_RADIUS_KM: f64 = 10.0;

#[derive(Debug, Error)]
pub enum GymError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Registers a gym
pub struct CreateGymUseCase {
    gyms: Arc<dyn GymStore>,
}

impl CreateGymUseCase {
    pub fn new(gyms: Arc<dyn GymStore>) -> Self {
        Self { gyms }
    }

    pub async fn execute(&self, request: CreateGymRequest) -> Result<GymResponse, GymError> {
        request.validate()?;

        let gym = self
            .gyms
            .create(NewGym {
                id: None,
                title: request.title,
                description: request.description,
                phone: request.phone,
                latitude: request.latitude,
                longitude: request.longitude,
            })
            .await?;

        tracing::info!("Created gym {} ({})", gym.id, gym.title);
        Ok(GymResponse { gym })
    }
}

/// Finds gyms whose title contains a query
pub struct SearchGymsUseCase {
    gyms: Arc<dyn GymStore>,
}

impl SearchGymsUseCase {
    pub fn new(gyms: Arc<dyn GymStore>) -> Self {
        Self { gyms }
    }

    pub async fn execute(&self, request: SearchGymsRequest) -> Result<GymsResponse, GymError> {
        request.validate()?;
        let gyms = self.gyms.search_many(&request.query, request.page).await?;

        tracing::debug!("Search {:?} page {} returned {} gyms", request.query, request.page, gyms.len());
        Ok(GymsResponse { gyms })
    }
}

/// Lists gyms within walking/driving range of the user
pub struct FetchNearbyGymsUseCase {
    gyms: Arc<dyn GymStore>,
    radius_km: f64,
}

impl FetchNearbyGymsUseCase {
    pub fn new(gyms: Arc<dyn GymStore>) -> Self {
        Self {
            gyms,
            radius_km: NEARBY_RADIUS_KM,
        }
    }

    pub fn from_settings(gyms: Arc<dyn GymStore>, settings: &GymSettings) -> Self {
        Self::new(gyms).with_radius_km(settings.nearby_radius_km)
    }

    pub fn with_radius_km(mut self, radius_km: f64) -> Self {
        self.radius_km = radius_km;
        self
    }

    pub async fn execute(&self, request: NearbyGymsRequest) -> Result<GymsResponse, GymError> {
        request.validate()?;

        let center = Coordinate::new(request.user_latitude, request.user_longitude);
        let gyms = self.gyms.find_many_nearby(center, self.radius_km).await?;

        Ok(GymsResponse { gyms })
    }
}
