//! Haversine-based nearby-spot queries.
//!
//! Pure functions over already-normalized spots.

use swedespot_core::{Coordinates, ParkingSpot, VehicleType};

/// Mean Earth radius used for great-circle distances.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Search radius applied when the caller gives none.
pub const DEFAULT_RADIUS_METERS: f64 = 1000.0;

/// Great-circle distance between two points, in kilometres.
#[must_use]
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// `car` shows every spot; any other type only matches itself.
fn matches_vehicle(spot: &ParkingSpot, vehicle: VehicleType) -> bool {
    vehicle == VehicleType::Car || spot.vehicle_type == vehicle
}

/// Spots usable by `vehicle` within `radius_m` metres of `origin`.
///
/// Input order is preserved. A spot exactly on the boundary is included.
/// A NaN origin or radius matches nothing.
#[must_use]
pub fn nearby(
    spots: &[ParkingSpot],
    origin: Coordinates,
    vehicle: VehicleType,
    radius_m: f64,
) -> Vec<ParkingSpot> {
    spots
        .iter()
        .filter(|spot| matches_vehicle(spot, vehicle))
        .filter(|spot| haversine_km(origin, spot.coordinates()) * 1000.0 <= radius_m)
        .cloned()
        .collect()
}

/// Pairs each spot with its distance from `origin` in metres, closest first.
#[must_use]
pub fn sort_by_distance(spots: Vec<ParkingSpot>, origin: Coordinates) -> Vec<(ParkingSpot, f64)> {
    let mut with_distance: Vec<(ParkingSpot, f64)> = spots
        .into_iter()
        .map(|spot| {
            let meters = haversine_km(origin, spot.coordinates()) * 1000.0;
            (spot, meters)
        })
        .collect();
    with_distance.sort_by(|a, b| a.1.total_cmp(&b.1));
    with_distance
}
