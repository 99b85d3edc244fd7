// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{BoundingBox, CheckIn, Coordinate, Gym, NewCheckIn, NewGym};
pub use requests::{CheckInRequest, CheckInsHistoryRequest, CreateGymRequest, NearbyGymsRequest, SearchGymsRequest, UserMetricsRequest};
pub use responses::{CheckInResponse, CheckInsHistoryResponse, GymResponse, GymsResponse, UserMetricsResponse};
