//! Endpoint and tuning constants for the geo clients.

use std::time::Duration;

/// OpenStreetMap Nominatim search endpoint.
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";
/// Public Overpass API interpreter endpoint.
pub const DEFAULT_OVERPASS_URL: &str = "http://overpass-api.de/api/interpreter";
/// Nominatim's usage policy requires an identifying User-Agent.
pub const DEFAULT_USER_AGENT: &str = "PatientDashboard/1.0";
/// Geocoding is restricted to Tanzania and Kenya by default.
pub const DEFAULT_COUNTRY_CODES: &[&str] = &["tz", "ke"];

/// Settings shared by the geocoder and the facility finder.
///
/// `Default` gives the production values; tests point the URLs at a mock
/// server through the `with_*` methods.
#[derive(Debug, Clone)]
pub struct GeoConfig {
    pub nominatim_url: String,
    pub overpass_url: String,
    pub user_agent: String,
    /// ISO 3166-1 alpha-2 codes passed as Nominatim's `countrycodes`.
    /// Empty means no restriction.
    pub country_codes: Vec<String>,
    /// Client-side timeout for one geocoding request (10 s).
    pub geocode_timeout: Duration,
    /// Client-side timeout for one Overpass request (30 s).
    pub facility_timeout: Duration,
    /// Server-side timeout embedded in the Overpass query (25 s).
    pub overpass_server_timeout_secs: u32,
    /// Radius used by `find_hospitals_default` (10 km).
    pub default_radius_km: f64,
    /// Maximum number of facilities returned (10).
    pub max_results: usize,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            nominatim_url: DEFAULT_NOMINATIM_URL.to_string(),
            overpass_url: DEFAULT_OVERPASS_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            country_codes: DEFAULT_COUNTRY_CODES.iter().map(|c| c.to_string()).collect(),
            geocode_timeout: Duration::from_secs(10),
            facility_timeout: Duration::from_secs(30),
            overpass_server_timeout_secs: 25,
            default_radius_km: 10.0,
            max_results: 10,
        }
    }
}

impl GeoConfig {
    pub fn with_nominatim_url(mut self, url: impl Into<String>) -> Self {
        self.nominatim_url = url.into();
        self
    }

    pub fn with_overpass_url(mut self, url: impl Into<String>) -> Self {
        self.overpass_url = url.into();
        self
    }

    pub fn with_country_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.country_codes = codes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeouts(mut self, geocode: Duration, facility: Duration) -> Self {
        self.geocode_timeout = geocode;
        self.facility_timeout = facility;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Country filter as Nominatim expects it ("tz,ke"), or `None` when unrestricted.
    pub fn country_filter(&self) -> Option<String> {
        let codes: Vec<&str> = self
            .country_codes
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect();
        if codes.is_empty() {
            None
        } else {
            Some(codes.join(",").to_lowercase())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = GeoConfig::default();
        assert_eq!(cfg.geocode_timeout, Duration::from_secs(10));
        assert_eq!(cfg.facility_timeout, Duration::from_secs(30));
        assert_eq!(cfg.overpass_server_timeout_secs, 25);
        assert_eq!(cfg.default_radius_km, 10.0);
        assert_eq!(cfg.max_results, 10);
        assert_eq!(cfg.country_filter().as_deref(), Some("tz,ke"));
    }

    #[test]
    fn test_country_filter_normalises() {
        let cfg = GeoConfig::default().with_country_codes([" TZ", "", "UG "]);
        assert_eq!(cfg.country_filter().as_deref(), Some("tz,ug"));
    }

    #[test]
    fn test_empty_country_filter() {
        let cfg = GeoConfig::default().with_country_codes(Vec::<String>::new());
        assert!(cfg.country_filter().is_none());
    }
}
