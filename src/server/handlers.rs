use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use crate::care::NearbyCare;
use crate::geo::{ConsultationChannel, Coordinate, FacilityRecord, GeocodeResult};

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

pub struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        api_error(rejection.status(), rejection.body_text())
    }
}

/// Unwrap query parameters, turning axum's plain-text rejection into `ApiError`.
fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query.map(|Query(params)| params).map_err(ApiError::from)
}

fn required(value: Option<f64>, name: &str) -> Result<f64, ApiError> {
    value.ok_or_else(|| api_error(StatusCode::BAD_REQUEST, format!("Missing '{}' parameter", name)))
}

/// Run a blocking geo call on tokio's blocking pool.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, format!("Worker failed: {}", e)))
}

fn checked_coordinate(lat: f64, lon: f64) -> Result<Coordinate, ApiError> {
    let c = Coordinate::new(lat, lon);
    if c.is_valid() {
        Ok(c)
    } else {
        Err(api_error(
            StatusCode::BAD_REQUEST,
            "Invalid coordinates. Lat: -90..90, Lon: -180..180",
        ))
    }
}

// ─── GET /api/geocode ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct GeocodeQuery {
    pub address: Option<String>,
}

pub async fn geocode(
    State(state): State<Arc<AppState>>,
    query: Result<Query<GeocodeQuery>, QueryRejection>,
) -> Result<Json<GeocodeResult>, ApiError> {
    let start = Instant::now();
    let params = query_params(query)?;

    let address = params.address.unwrap_or_default().trim().to_string();
    if address.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Missing 'address' parameter"));
    }

    let query = address.clone();
    let resolved = blocking(move || state.care.geocoder().resolve(&query)).await?;

    info!(
        "GET /api/geocode address={} -> {} ({:.1}ms)",
        address,
        if resolved.is_some() { "found" } else { "none" },
        start.elapsed().as_secs_f64() * 1000.0,
    );

    resolved
        .map(Json)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("Address not found: '{}'", address)))
}

// ─── GET /api/hospitals ──────────────────────────────────────────

#[derive(Deserialize)]
pub struct HospitalsQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub radius_km: Option<f64>,
}

#[derive(Serialize)]
pub struct HospitalsResponse {
    pub hospitals: Vec<FacilityRecord>,
    pub count: usize,
}

pub async fn hospitals(
    State(state): State<Arc<AppState>>,
    query: Result<Query<HospitalsQuery>, QueryRejection>,
) -> Result<Json<HospitalsResponse>, ApiError> {
    let start = Instant::now();
    let params = query_params(query)?;

    let center = checked_coordinate(required(params.lat, "lat")?, required(params.lon, "lon")?)?;
    let radius_km = params
        .radius_km
        .unwrap_or(state.care.finder().config().default_radius_km);
    if !(radius_km.is_finite() && radius_km > 0.0) {
        return Err(api_error(StatusCode::BAD_REQUEST, "radius_km must be a positive number"));
    }

    let hospitals = blocking(move || state.care.finder().find_hospitals(center, radius_km)).await?;

    info!(
        "GET /api/hospitals around {} radius={}km -> {} ({:.1}ms)",
        center,
        radius_km,
        hospitals.len(),
        start.elapsed().as_secs_f64() * 1000.0,
    );

    Ok(Json(HospitalsResponse {
        count: hospitals.len(),
        hospitals,
    }))
}

// ─── GET /api/nearby-care ────────────────────────────────────────

#[derive(Deserialize)]
pub struct NearbyCareQuery {
    pub address: Option<String>,
}

pub async fn nearby_care(
    State(state): State<Arc<AppState>>,
    query: Result<Query<NearbyCareQuery>, QueryRejection>,
) -> Result<Json<NearbyCare>, ApiError> {
    let start = Instant::now();
    let params = query_params(query)?;
    let care = blocking(move || state.care.lookup(params.address.as_deref())).await?;

    info!(
        "GET /api/nearby-care -> {} ({:.1}ms)",
        care.location_status,
        start.elapsed().as_secs_f64() * 1000.0,
    );

    Ok(Json(care))
}

// ─── GET /api/consultation-groups ────────────────────────────────

pub async fn consultation_groups() -> Json<BTreeMap<String, ConsultationChannel>> {
    Json(crate::geo::consultation_groups())
}

// ─── GET /api/consultation-groups/{id} ───────────────────────────

pub async fn consultation_channel(Path(id): Path<String>) -> Result<Json<ConsultationChannel>, ApiError> {
    crate::geo::consultation_channel(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("Unknown consultation channel '{}'", id)))
}

// ─── GET /api/distance ───────────────────────────────────────────

#[derive(Deserialize)]
pub struct DistanceQuery {
    pub from_lat: Option<f64>,
    pub from_lon: Option<f64>,
    pub to_lat: Option<f64>,
    pub to_lon: Option<f64>,
}

#[derive(Serialize)]
pub struct DistanceResponse {
    pub distance_km: f64,
    pub distance_text: String,
}

pub async fn distance(
    query: Result<Query<DistanceQuery>, QueryRejection>,
) -> Result<Json<DistanceResponse>, ApiError> {
    let params = query_params(query)?;
    let from = checked_coordinate(required(params.from_lat, "from_lat")?, required(params.from_lon, "from_lon")?)?;
    let to = checked_coordinate(required(params.to_lat, "to_lat")?, required(params.to_lon, "to_lon")?)?;
    let km = from.distance_km(&to);

    Ok(Json(DistanceResponse {
        distance_km: crate::geo::distance::round_km(km),
        distance_text: crate::geo::distance::format_km(km),
    }))
}
