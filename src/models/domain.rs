use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Geographic point in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// A gym users can check in at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gym {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl Gym {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Data needed to register a gym
///
/// `id` is optional so callers (and fixtures) can pin one; a UUID is
/// generated by the store otherwise.
#[derive(Debug, Clone, Default)]
pub struct NewGym {
    pub id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

/// A user's presence at a gym on a given day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckIn {
    pub id: String,
    #[serde(rename = "gymId")]
    pub gym_id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "validatedAt", default)]
    pub validated_at: Option<DateTime<Utc>>,
}

/// Data needed to persist a check-in
#[derive(Debug, Clone)]
pub struct NewCheckIn {
    pub user_id: String,
    pub gym_id: String,
    pub created_at: DateTime<Utc>,
}

/// Geospatial bounding box
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}
