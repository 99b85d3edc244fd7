use serde::{Deserialize, Serialize};
use crate::models::domain::{CheckIn, Gym};

/// Response for a successful check-in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInResponse {
    #[serde(rename = "checkIn")]
    pub check_in: CheckIn,
}

/// Response carrying a single gym
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GymResponse {
    pub gym: Gym,
}

/// Response carrying a list of gyms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GymsResponse {
    pub gyms: Vec<Gym>,
}

/// Response for check-in history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInsHistoryResponse {
    #[serde(rename = "checkIns")]
    pub check_ins: Vec<CheckIn>,
}

/// Response for user metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserMetricsResponse {
    #[serde(rename = "checkInsCount")]
    pub check_ins_count: u64,
}
