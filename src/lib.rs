//! Care Locator — geolocation helpers for the patient dashboard.
//!
//! Resolves patient addresses, measures great-circle distances and finds
//! nearby hospitals from OpenStreetMap data.

pub mod care;
pub mod geo;
pub mod server;
