//! Great-circle distance on a spherical Earth.

use super::types::Coordinate;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points in kilometres.
///
/// Inputs are taken as degrees without range checks.
pub fn haversine_km(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = lat2 - lat1;
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // Clamp guards asin against h creeping past 1.0 for antipodal points.
    let c = 2.0 * h.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

/// Round to two decimal places, as used for `FacilityRecord::distance_km`.
pub fn round_km(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}

/// Human-readable distance with one decimal, e.g. "3.4 km".
pub fn format_km(km: f64) -> String {
    format!("{:.1} km", km)
}
