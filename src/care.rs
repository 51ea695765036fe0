//! Nearby care lookup for a patient address.
//!
//! Flow: address → geocoder → facility finder → consultation directory.
//! Every stage degrades to a status instead of an error, so the dashboard
//! always receives the consultation links.

use std::collections::BTreeMap;
use std::fmt;

use log::info;
use serde::Serialize;

use crate::geo::{
    consultation_groups, ConsultationChannel, FacilityFinder, FacilityRecord, GeoConfig, GeocodeResult, Geocoder,
};

/// Outcome of a nearby care lookup, as consumed by the dashboard frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationStatus {
    Found,
    NoAddressProvided,
    GeocodingFailed,
    NoHospitalsFound,
}

impl fmt::Display for LocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found => write!(f, "found"),
            Self::NoAddressProvided => write!(f, "no_address_provided"),
            Self::GeocodingFailed => write!(f, "geocoding_failed"),
            Self::NoHospitalsFound => write!(f, "no_hospitals_found"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NearbyCare {
    pub location_status: LocationStatus,
    pub patient_coordinates: Option<GeocodeResult>,
    pub nearby_hospitals: Vec<FacilityRecord>,
    pub hospitals_count: usize,
    pub consultation_groups: BTreeMap<String, ConsultationChannel>,
}

/// Composes the geocoder and facility finder for one address.
#[derive(Debug, Clone, Default)]
pub struct NearbyCareService {
    geocoder: Geocoder,
    finder: FacilityFinder,
}

impl NearbyCareService {
    pub fn new(config: GeoConfig) -> Self {
        Self {
            geocoder: Geocoder::new(config.clone()),
            finder: FacilityFinder::new(config),
        }
    }

    pub fn geocoder(&self) -> &Geocoder {
        &self.geocoder
    }

    pub fn finder(&self) -> &FacilityFinder {
        &self.finder
    }

    /// Resolve `address` and collect hospitals within the default radius.
    pub fn lookup(&self, address: Option<&str>) -> NearbyCare {
        let address = address.map(str::trim).filter(|a| !a.is_empty());

        let (status, patient, hospitals) = match address {
            None => (LocationStatus::NoAddressProvided, None, Vec::new()),
            Some(addr) => match self.geocoder.resolve(addr) {
                None => (LocationStatus::GeocodingFailed, None, Vec::new()),
                Some(found) => {
                    let hospitals = self.finder.find_hospitals_default(found.coordinate);
                    let status = if hospitals.is_empty() {
                        LocationStatus::NoHospitalsFound
                    } else {
                        LocationStatus::Found
                    };
                    (status, Some(found), hospitals)
                }
            },
        };

        info!(
            "Nearby care lookup: status={} hospitals={}",
            status,
            hospitals.len()
        );

        NearbyCare {
            location_status: status,
            patient_coordinates: patient,
            hospitals_count: hospitals.len(),
            nearby_hospitals: hospitals,
            consultation_groups: consultation_groups(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_address_skips_network() {
        // Unroutable endpoints: reaching them would change the status.
        let config = GeoConfig::default()
            .with_nominatim_url("http://127.0.0.1:1/search")
            .with_overpass_url("http://127.0.0.1:1/api/interpreter");
        let service = NearbyCareService::new(config);

        for input in [None, Some(""), Some("   ")] {
            let care = service.lookup(input);
            assert_eq!(care.location_status, LocationStatus::NoAddressProvided);
            assert!(care.patient_coordinates.is_none());
            assert_eq!(care.hospitals_count, 0);
            assert!(care.consultation_groups.contains_key("whatsapp"));
        }
    }

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(LocationStatus::NoHospitalsFound).unwrap(),
            "no_hospitals_found"
        );
        assert_eq!(LocationStatus::GeocodingFailed.to_string(), "geocoding_failed");
    }
}
