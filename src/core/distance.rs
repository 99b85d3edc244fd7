use crate::models::{BoundingBox, Coordinate};

/// Earth's radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in kilometers
///
/// Uses the spherical law of cosines. Inputs are degrees and are not range
/// checked. Identical points yield exactly `0.0`, and the cosine sum is
/// clamped to [-1, 1] so rounding drift never turns into `NaN`.
///
/// # Arguments
/// * `from` - First point
/// * `to` - Second point
///
/// # Returns
/// Distance in kilometers
#[inline]
pub fn distance_between_coordinates(from: Coordinate, to: Coordinate) -> f64 {
    if from == to {
        return 0.0;
    }

    let from_lat = from.latitude.to_radians();
    let to_lat = to.latitude.to_radians();
    let delta_lon = (from.longitude - to.longitude).to_radians();

    let cosine = from_lat.sin() * to_lat.sin()
        + from_lat.cos() * to_lat.cos() * delta_lon.cos();

    EARTH_RADIUS_KM * cosine.clamp(-1.0, 1.0).acos()
}

/// Calculate a bounding box around a center point
///
/// Much cheaper than the trigonometric distance, used to pre-filter gyms.
/// 1° latitude ≈ 111km, 1° longitude ≈ 111km * cos(latitude)
///
/// A box that would cross the antimeridian spans every longitude instead,
/// so the pre-filter never drops points on the other side of ±180°.
pub fn calculate_bounding_box(center: Coordinate, radius_km: f64) -> BoundingBox {
    let lat_delta = radius_km / 111.0;

    // Near the poles the longitude span degenerates; take the full circle.
    let lon_scale = 111.0 * center.latitude.to_radians().cos().abs();
    let lon_delta = if lon_scale < f64::EPSILON {
        180.0
    } else {
        radius_km / lon_scale
    };

    let (min_lon, max_lon) = if center.longitude - lon_delta < -180.0 || center.longitude + lon_delta > 180.0 {
        (-180.0, 180.0)
    } else {
        (center.longitude - lon_delta, center.longitude + lon_delta)
    };

    BoundingBox {
        min_lat: center.latitude - lat_delta,
        max_lat: center.latitude + lat_delta,
        min_lon,
        max_lon,
    }
}

/// Check if a point is within a bounding box
#[inline]
pub fn is_within_bounding_box(point: Coordinate, bbox: &BoundingBox) -> bool {
    point.latitude >= bbox.min_lat
        && point.latitude <= bbox.max_lat
        && point.longitude >= bbox.min_lon
        && point.longitude <= bbox.max_lon
}
