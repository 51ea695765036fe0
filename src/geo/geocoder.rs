//! Address resolution via OpenStreetMap Nominatim.

use log::{debug, warn};
use serde::Deserialize;

use super::config::GeoConfig;
use super::types::{Coordinate, GeoError, GeocodeResult};

#[derive(Deserialize, Debug, Clone)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

/// Blocking Nominatim client. Holds only configuration, so one instance can
/// be shared freely between threads.
#[derive(Debug, Clone, Default)]
pub struct Geocoder {
    config: GeoConfig,
}

impl Geocoder {
    pub fn new(config: GeoConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeoConfig {
        &self.config
    }

    /// Resolve a free-text address to its best match.
    ///
    /// Returns `None` for an empty address, zero matches, or any transport
    /// or decoding failure. Failures are logged, never returned.
    pub fn resolve(&self, address: &str) -> Option<GeocodeResult> {
        match self.try_resolve(address) {
            Ok(Some(result)) => Some(result),
            Ok(None) => {
                debug!("Nominatim returned no match for '{}'", address);
                None
            }
            Err(GeoError::NoInput) => None,
            Err(e) => {
                warn!("Geocoding '{}' failed: {}", address, e);
                None
            }
        }
    }

    /// Same as [`resolve`](Self::resolve) but with the failure cause kept.
    pub fn try_resolve(&self, address: &str) -> Result<Option<GeocodeResult>, GeoError> {
        let query = address.trim();
        if query.is_empty() {
            return Err(GeoError::NoInput);
        }

        let mut request = ureq::get(&self.config.nominatim_url)
            .set("User-Agent", &self.config.user_agent)
            .timeout(self.config.geocode_timeout)
            .query("q", query)
            .query("format", "json")
            .query("limit", "1");
        if let Some(countries) = self.config.country_filter() {
            request = request.query("countrycodes", &countries);
        }

        debug!("GET {} q='{}'", self.config.nominatim_url, query);
        let places: Vec<NominatimPlace> = request.call()?.into_json()?;

        places
            .into_iter()
            .next()
            .map(|place| place_to_result(place, query))
            .transpose()
    }
}

fn place_to_result(place: NominatimPlace, query: &str) -> Result<GeocodeResult, GeoError> {
    let lat = parse_degrees("lat", &place.lat)?;
    let lon = parse_degrees("lon", &place.lon)?;
    let display_name = place
        .display_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| query.to_string());

    Ok(GeocodeResult {
        coordinate: Coordinate::new(lat, lon),
        display_name,
    })
}

fn parse_degrees(field: &str, raw: &str) -> Result<f64, GeoError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| GeoError::Malformed(format!("{} is not a number: '{}'", field, raw)))
}
