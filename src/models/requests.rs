use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to check a user in at a gym
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInRequest {
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[serde(alias = "gym_id", rename = "gymId")]
    pub gym_id: String,
    #[serde(alias = "user_latitude", rename = "userLatitude")]
    pub user_latitude: f64,
    #[serde(alias = "user_longitude", rename = "userLongitude")]
    pub user_longitude: f64,
}

/// Request to register a gym
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateGymRequest {
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

/// Request to search gyms by title
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchGymsRequest {
    #[serde(alias = "q")]
    pub query: String,
    #[validate(range(min = 1))]
    #[serde(default = "default_page")]
    pub page: u32,
}

/// Request for gyms near the user
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NearbyGymsRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    #[serde(alias = "latitude", rename = "userLatitude")]
    pub user_latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    #[serde(alias = "longitude", rename = "userLongitude")]
    pub user_longitude: f64,
}

/// Request for a user's check-in history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInsHistoryRequest {
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[serde(default = "default_page")]
    pub page: u32,
}

/// Request for a user's check-in metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserMetricsRequest {
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
}

fn default_page() -> u32 {
    1
}
