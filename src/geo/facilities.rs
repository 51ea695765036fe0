//! Nearby hospital search via the OpenStreetMap Overpass API.
//!
//! Flow: build an `around:` query for hospital nodes, ways and relations →
//! POST it → pick a coordinate per element → drop unidentifiable entries →
//! measure distance from the centre → sort ascending → keep the closest N.

use std::collections::HashMap;

use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;

use super::config::GeoConfig;
use super::distance::{format_km, haversine_km, round_km};
use super::types::{Coordinate, FacilityRecord, GeoError};

pub const UNKNOWN_NAME: &str = "Unknown Hospital";
pub const NO_ADDRESS: &str = "Address not available";
pub const NO_PHONE: &str = "Not available";
pub const UNKNOWN_EMERGENCY: &str = "unknown";

#[derive(Deserialize, Debug)]
struct OverpassResponse {
    elements: Vec<Value>,
}

#[derive(Deserialize, Debug)]
struct OverpassElement {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
    #[serde(default)]
    center: Option<Center>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

#[derive(Deserialize, Debug, Clone, Copy)]
struct Center {
    lat: f64,
    lon: f64,
}

impl OverpassElement {
    /// Nodes carry their own position; ways and relations only have one
    /// when the query asked for `out center`.
    fn coordinate(&self) -> Option<Coordinate> {
        if self.kind == "node" {
            Some(Coordinate::new(self.lat?, self.lon?))
        } else {
            self.center.map(|c| Coordinate::new(c.lat, c.lon))
        }
    }

    fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn first_tag(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|k| self.tag(k))
    }
}

/// Blocking Overpass client for hospitals around a point.
#[derive(Debug, Clone, Default)]
pub struct FacilityFinder {
    config: GeoConfig,
}

impl FacilityFinder {
    pub fn new(config: GeoConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeoConfig {
        &self.config
    }

    /// Hospitals within the configured default radius (10 km).
    pub fn find_hospitals_default(&self, center: Coordinate) -> Vec<FacilityRecord> {
        self.find_hospitals(center, self.config.default_radius_km)
    }

    /// Up to `max_results` hospitals within `radius_km` of `center`, closest
    /// first. Any request or decoding failure yields an empty list.
    pub fn find_hospitals(&self, center: Coordinate, radius_km: f64) -> Vec<FacilityRecord> {
        match self.try_find_hospitals(center, radius_km) {
            Ok(hospitals) => hospitals,
            Err(e) => {
                warn!("Hospital search around {} failed: {}", center, e);
                Vec::new()
            }
        }
    }

    /// Same as [`find_hospitals`](Self::find_hospitals) but with the failure cause kept.
    pub fn try_find_hospitals(
        &self,
        center: Coordinate,
        radius_km: f64,
    ) -> Result<Vec<FacilityRecord>, GeoError> {
        let query = hospital_query(center, radius_km, self.config.overpass_server_timeout_secs);
        debug!("POST {} radius={}km around {}", self.config.overpass_url, radius_km, center);

        let response: OverpassResponse = ureq::post(&self.config.overpass_url)
            .set("User-Agent", &self.config.user_agent)
            .timeout(self.config.facility_timeout)
            .send_string(&query)?
            .into_json()?;

        let hospitals = rank_hospitals(center, response.elements, self.config.max_results);
        debug!("Overpass returned {} usable hospitals", hospitals.len());
        Ok(hospitals)
    }
}

/// Overpass QL for hospital nodes, ways and relations within `radius_km`.
pub fn hospital_query(center: Coordinate, radius_km: f64, server_timeout_secs: u32) -> String {
    let radius_m = (radius_km * 1000.0).round().max(0.0) as u64;
    let around = format!("(around:{},{},{})", radius_m, center.lat, center.lon);
    format!(
        "[out:json][timeout:{timeout}];\n\
         (\n  \
         node[\"amenity\"=\"hospital\"]{around};\n  \
         way[\"amenity\"=\"hospital\"]{around};\n  \
         relation[\"amenity\"=\"hospital\"]{around};\n\
         );\n\
         out center meta;\n",
        timeout = server_timeout_secs,
        around = around,
    )
}

/// Turn raw Overpass elements into display records sorted by distance.
///
/// Elements that fail to decode or have no usable coordinate are skipped
/// individually; the rest of the response is still used.
fn rank_hospitals(center: Coordinate, elements: Vec<Value>, max_results: usize) -> Vec<FacilityRecord> {
    let mut hospitals: Vec<FacilityRecord> = elements
        .into_iter()
        .filter_map(|raw| match serde_json::from_value::<OverpassElement>(raw) {
            Ok(element) => Some(element),
            Err(e) => {
                warn!("Skipping malformed Overpass element: {}", e);
                None
            }
        })
        .filter_map(|element| to_record(center, &element))
        .collect();

    hospitals.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    hospitals.truncate(max_results);
    hospitals
}

fn to_record(center: Coordinate, element: &OverpassElement) -> Option<FacilityRecord> {
    let coordinates = element.coordinate()?;

    let name = element.tag("name");
    let operator = element.tag("operator");
    // Neither a name nor an operator: nothing meaningful to show.
    if name.is_none() && operator.is_none() {
        return None;
    }

    let distance = haversine_km(&center, &coordinates);

    Some(FacilityRecord {
        name: name.unwrap_or(UNKNOWN_NAME).to_string(),
        distance_km: round_km(distance),
        distance_text: format_km(distance),
        address: element
            .first_tag(&["addr:full", "addr:street"])
            .unwrap_or(NO_ADDRESS)
            .to_string(),
        phone: element
            .first_tag(&["phone", "contact:phone"])
            .unwrap_or(NO_PHONE)
            .to_string(),
        website: element
            .first_tag(&["website", "contact:website"])
            .unwrap_or_default()
            .to_string(),
        operator: operator.unwrap_or_default().to_string(),
        emergency: element.tag("emergency").unwrap_or(UNKNOWN_EMERGENCY).to_string(),
        coordinates,
    })
}
