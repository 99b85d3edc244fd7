//! GymPass check-in core
//!
//! Decides whether a user may check in at a gym: the user must be within
//! 100 meters of the gym and may check in at most once per calendar day.
//! Gym and check-in persistence sit behind store traits with in-memory and
//! PostgreSQL implementations; time comes from an injectable clock.

pub mod config;
pub mod core;
pub mod logging;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use crate::core::{CheckInError, CheckInUseCase, Clock, MockClock, SystemClock, distance::distance_between_coordinates};
pub use models::{CheckIn, CheckInRequest, CheckInResponse, Coordinate, Gym};
pub use services::{CheckInStore, GymStore, StoreError};
