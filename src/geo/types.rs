//! Core types for the geolocation subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point on the Earth's surface in decimal degrees.
///
/// No range validation happens here; callers accepting user input check
/// `is_valid()` before handing coordinates to the geo functions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Latitude within -90..=90 and longitude within -180..=180.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }

    /// Great-circle distance to `other` in kilometres.
    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        super::distance::haversine_km(self, other)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.lat >= 0.0 { 'N' } else { 'S' };
        let ew = if self.lon >= 0.0 { 'E' } else { 'W' };
        write!(f, "{:.4}\u{00B0}{}, {:.4}\u{00B0}{}", self.lat.abs(), ns, self.lon.abs(), ew)
    }
}

/// Best match returned by the geocoder for a free-text address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    #[serde(flatten)]
    pub coordinate: Coordinate,
    /// Full display name from the provider, or the original query when the
    /// provider omitted one.
    pub display_name: String,
}

/// A hospital near a query point, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityRecord {
    pub name: String,
    /// Haversine distance from the query centre, rounded to 2 decimals.
    pub distance_km: f64,
    /// Same distance with 1 decimal and a unit, e.g. "3.4 km".
    pub distance_text: String,
    pub address: String,
    pub phone: String,
    pub website: String,
    pub operator: String,
    /// OSM `emergency` tag value ("yes", "no", ...) or "unknown".
    pub emergency: String,
    pub coordinates: Coordinate,
}

/// A community consultation link shown to patients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsultationChannel {
    pub name: &'static str,
    pub link: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub available: bool,
}

/// Failures inside the geo clients.
///
/// These never leave the public geo API: each one is logged and turned into
/// an absent result or an empty list at the entry point.
#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    #[error("no address given")]
    NoInput,
    #[error("request failed: {0}")]
    Request(#[from] Box<ureq::Error>),
    #[error("could not decode response body: {0}")]
    Decode(#[from] std::io::Error),
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<ureq::Error> for GeoError {
    fn from(err: ureq::Error) -> Self {
        Self::Request(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_validity() {
        assert!(Coordinate::new(-6.7924, 39.2083).is_valid());
        assert!(Coordinate::new(90.0, -180.0).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, 180.5).is_valid());
    }

    #[test]
    fn test_coordinate_display() {
        let dar = Coordinate::new(-6.7924, 39.2083);
        assert_eq!(dar.to_string(), "6.7924\u{00B0}S, 39.2083\u{00B0}E");
    }

    #[test]
    fn test_geocode_result_flattens_coordinate() {
        let result = GeocodeResult {
            coordinate: Coordinate::new(-1.2921, 36.8219),
            display_name: "Nairobi, Kenya".into(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["lat"], -1.2921);
        assert_eq!(json["lon"], 36.8219);
        assert_eq!(json["display_name"], "Nairobi, Kenya");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(GeoError::NoInput.to_string(), "no address given");
        assert_eq!(
            GeoError::Malformed("lat is not a number".into()).to_string(),
            "malformed response: lat is not a number"
        );
    }
}
