mod handlers;
mod state;

use axum::http::{header, HeaderValue};
use axum::routing::get;
use axum::Router;
use log::{error, info};
use state::AppState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::care::NearbyCareService;
use crate::geo::GeoConfig;

pub fn build_router(config: GeoConfig) -> Router {
    let state = Arc::new(AppState {
        care: NearbyCareService::new(config),
    });

    Router::new()
        .route("/api/geocode", get(handlers::geocode))
        .route("/api/hospitals", get(handlers::hospitals))
        .route("/api/nearby-care", get(handlers::nearby_care))
        .route("/api/consultation-groups", get(handlers::consultation_groups))
        .route("/api/consultation-groups/{id}", get(handlers::consultation_channel))
        .route("/api/distance", get(handlers::distance))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(host: &str, port: u16, config: GeoConfig) {
    let app = build_router(config);
    let addr = format!("{}:{}", host, port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Cannot bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    info!("Care Locator server listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn offline_router() -> Router {
        build_router(
            GeoConfig::default()
                .with_nominatim_url("http://127.0.0.1:1/search")
                .with_overpass_url("http://127.0.0.1:1/api/interpreter"),
        )
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let response = offline_router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_consultation_groups_endpoint() {
        let (status, body) = get_json("/api/consultation-groups").await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body["whatsapp"]["link"].as_str().unwrap().is_empty());
        assert!(!body["telegram"]["link"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_single_consultation_channel() {
        let (status, body) = get_json("/api/consultation-groups/whatsapp").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["icon"], "whatsapp");

        let (status, body) = get_json("/api/consultation-groups/signal").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], 404);
    }

    #[tokio::test]
    async fn test_distance_endpoint() {
        let (status, body) = get_json("/api/distance?from_lat=0&from_lon=0&to_lat=0&to_lon=1").await;
        assert_eq!(status, StatusCode::OK);
        let km = body["distance_km"].as_f64().unwrap();
        assert!((km - 111.19).abs() < 0.01);
    }

    #[tokio::test]
    async fn test_distance_rejects_out_of_range() {
        let (status, body) = get_json("/api/distance?from_lat=95&from_lon=0&to_lat=0&to_lon=1").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);
    }

    #[tokio::test]
    async fn test_hospitals_rejects_bad_radius() {
        let (status, _) = get_json("/api/hospitals?lat=-6.79&lon=39.2&radius_km=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_hospitals_missing_coordinate_is_json_error() {
        let (status, body) = get_json("/api/hospitals?lon=39.2").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);
        assert_eq!(body["error"], "Missing 'lat' parameter");
    }

    #[tokio::test]
    async fn test_hospitals_non_numeric_coordinate_is_json_error() {
        let (status, body) = get_json("/api/hospitals?lat=abc&lon=39.2").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);
        assert!(body["error"].as_str().unwrap().contains("lat"));
    }

    #[tokio::test]
    async fn test_distance_missing_parameter_is_json_error() {
        let (status, body) = get_json("/api/distance?from_lat=0&from_lon=0&to_lat=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);
        assert_eq!(body["error"], "Missing 'to_lon' parameter");
    }

    #[tokio::test]
    async fn test_distance_non_numeric_parameter_is_json_error() {
        let (status, body) = get_json("/api/distance?from_lat=0&from_lon=east&to_lat=0&to_lon=1").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_geocode_requires_address() {
        let (status, body) = get_json("/api/geocode").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing 'address' parameter");
    }

    #[tokio::test]
    async fn test_nearby_care_without_address() {
        let (status, body) = get_json("/api/nearby-care").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["location_status"], "no_address_provided");
        assert_eq!(body["hospitals_count"], 0);
        assert!(body["consultation_groups"]["telegram"].is_object());
    }
}
