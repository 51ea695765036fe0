//! Geolocation subsystem for Care Locator.
//!
//! Provides address geocoding (Nominatim), great-circle distance, nearby
//! hospital search (Overpass) and the static consultation directory.

pub mod config;
pub mod directory;
pub mod distance;
pub mod facilities;
pub mod geocoder;
pub mod types;

pub use config::GeoConfig;
pub use directory::{consultation_channel, consultation_groups};
pub use distance::haversine_km;
pub use facilities::FacilityFinder;
pub use geocoder::Geocoder;
pub use types::{ConsultationChannel, Coordinate, FacilityRecord, GeoError, GeocodeResult};
