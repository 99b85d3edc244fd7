use std::sync::Arc;
use thiserror::Error;

use crate::config::CheckInSettings;
use crate::core::clock::Clock;
use crate::core::distance::distance_between_coordinates;
use crate::models::{CheckInRequest, CheckInResponse, Coordinate, NewCheckIn};
use crate::services::{CheckInStore, GymStore, StoreError};

/// Maximum distance between user and gym for a check-in (100 meters)
pub const MAX_DISTANCE_KM: f64 = 0.1;

/// Why a check-in was refused
#[derive(Debug, Error)]
pub enum CheckInError {
    /// The gym does not exist
    #[error("Resource not found.")]
    ResourceNotFound,

    #[error("Max distance reached: {distance_km:.3} km from gym, limit is {max_distance_km} km.")]
    MaxDistance { distance_km: f64, max_distance_km: f64 },

    /// The user already checked in today
    #[error("Max number of check-ins reached.")]
    MaxNumberOfCheckIns,

    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for CheckInError {
    fn from(err: StoreError) -> Self {
        match err {
            // The storage constraint and the read check enforce the same rule
            StoreError::DuplicateCheckIn { .. } => CheckInError::MaxNumberOfCheckIns,
            other => CheckInError::Store(other),
        }
    }
}

/// Decides whether a check-in is admissible and records it
///
/// # Pipeline Stages
/// 1. Gym resolution
/// 2. Proximity check against the gym's coordinates
/// 3. One check-in per user per calendar day
/// 4. Creation
pub struct CheckInUseCase {
    check_ins: Arc<dyn CheckInStore>,
    gyms: Arc<dyn GymStore>,
    clock: Arc<dyn Clock>,
    max_distance_km: f64,
}

impl CheckInUseCase {
    pub fn new(check_ins: Arc<dyn CheckInStore>, gyms: Arc<dyn GymStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            check_ins,
            gyms,
            clock,
            max_distance_km: MAX_DISTANCE_KM,
        }
    }

    pub fn from_settings(
        check_ins: Arc<dyn CheckInStore>,
        gyms: Arc<dyn GymStore>,
        clock: Arc<dyn Clock>,
        settings: &CheckInSettings,
    ) -> Self {
        Self::new(check_ins, gyms, clock).with_max_distance_km(settings.max_distance_km)
    }

    pub fn with_max_distance_km(mut self, max_distance_km: f64) -> Self {
        self.max_distance_km = max_distance_km;
        self
    }

    pub async fn execute(&self, request: CheckInRequest) -> Result<CheckInResponse, CheckInError> {
        let gym = self
            .gyms
            .find_by_id(&request.gym_id)
            .await?
            .ok_or(CheckInError::ResourceNotFound)?;

        let distance_km = distance_between_coordinates(
            Coordinate::new(request.user_latitude, request.user_longitude),
            gym.coordinate(),
        );

        // Non-finite coordinates give a NaN distance; never treat it as close
        if !distance_km.is_finite() || distance_km > self.max_distance_km {
            tracing::info!(
                "Rejected check-in for user {} at gym {}: {:.3} km away",
                request.user_id,
                gym.id,
                distance_km
            );
            return Err(CheckInError::MaxDistance {
                distance_km,
                max_distance_km: self.max_distance_km,
            });
        }

        let now = self.clock.now();

        if self
            .check_ins
            .find_by_user_id_on_date(&request.user_id, now)
            .await?
            .is_some()
        {
            tracing::info!("Rejected check-in for user {}: already checked in on {}", request.user_id, now.date_naive());
            return Err(CheckInError::MaxNumberOfCheckIns);
        }

        let check_in = self
            .check_ins
            .create(NewCheckIn {
                user_id: request.user_id,
                gym_id: request.gym_id,
                created_at: now,
            })
            .await?;

        tracing::info!("User {} checked in at gym {} ({})", check_in.user_id, check_in.gym_id, check_in.id);

        Ok(CheckInResponse { check_in })
    }
}
