// Core business rules
pub mod check_in;
pub mod clock;
pub mod distance;
pub mod gyms;
pub mod history;

pub use check_in::{CheckInError, CheckInUseCase, MAX_DISTANCE_KM};
pub use clock::{day_window, is_same_day, Clock, MockClock, SystemClock};
pub use distance::{calculate_bounding_box, distance_between_coordinates, is_within_bounding_box};
pub use gyms::{CreateGymUseCase, FetchNearbyGymsUseCase, GymError, SearchGymsUseCase, NEARBY_RADIUS_KM};
pub use history::{FetchUserCheckInsHistoryUseCase, GetUserMetricsUseCase, HistoryError};
