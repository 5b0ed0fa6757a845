use axum::{
    http::{HeaderValue, Method, StatusCode},
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    db::{ClickStore, HotelStore, RestaurantStore},
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::ListingSource,
};

pub mod clicks;
pub mod hotels;
pub mod recommendations;
pub mod restaurants;

/// Shared handler state. Each collaborator sits behind a trait object so the
/// router can run against Postgres or any other store.
#[derive(Clone)]
pub struct AppState {
    pub clicks: Arc<dyn ClickStore>,
    pub hotels: Arc<dyn HotelStore>,
    pub restaurants: Arc<dyn RestaurantStore>,
    pub listing_source: Arc<dyn ListingSource>,
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        // Click tracking and recommendations
        .route("/clicks", post(clicks::log_click))
        .route("/recommend", get(recommendations::recommend))
        // Ingestion from the scraper API
        .route("/hotels", get(hotels::ingest))
        .route("/restaurants", get(restaurants::ingest))
        // Listing filters
        .route("/hotels/filter", post(hotels::filter))
        .route("/api/hotels", get(hotels::list))
        .route("/restaurants/filter", post(restaurants::filter))
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
}

/// CORS for the browser frontend: listed origins, mirrored request headers, credentials allowed
pub fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| HeaderValue::from_str(origin))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Hotel API is running!" }))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
