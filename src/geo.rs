//! Geographic distance helpers
//!
//! Driving distance is approximated as great-circle distance multiplied by a
//! road correction factor. The factor is configurable; see
//! [`crate::config::RoutingConfig`].

use haversine::{Location as HaversineLocation, Units, distance};

use crate::models::Coordinates;

/// Great-circle distance between two coordinates in kilometers
#[must_use]
pub fn great_circle_km(from: &Coordinates, to: &Coordinates) -> f64 {
    let from_haversine = HaversineLocation {
        latitude: from.latitude,
        longitude: from.longitude,
    };
    let to_haversine = HaversineLocation {
        latitude: to.latitude,
        longitude: to.longitude,
    };
    distance(from_haversine, to_haversine, Units::Kilometers)
}

/// Approximate driving distance: great-circle distance × road factor
#[must_use]
pub fn road_distance_km(from: &Coordinates, to: &Coordinates, road_factor: f64) -> f64 {
    great_circle_km(from, to) * road_factor
}

/// Driving distance between optional coordinates.
///
/// A missing coordinate yields 0 km. Distance degrades rather than errors so
/// that a city without geocoded data never aborts planning.
#[must_use]
pub fn road_distance_between(
    from: Option<Coordinates>,
    to: Option<Coordinates>,
    road_factor: f64,
) -> f64 {
    match (from, to) {
        (Some(a), Some(b)) => road_distance_km(&a, &b, road_factor),
        _ => 0.0,
    }
}
