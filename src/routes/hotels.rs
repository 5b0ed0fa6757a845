use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{HotelFilter, HotelListing},
    routes::AppState,
    services::ingestion,
};

#[derive(Debug, Deserialize)]
pub struct CityQuery {
    pub city: String,
}

/// Query form of the hotel filter, every bound defaulted
#[derive(Debug, Deserialize)]
pub struct HotelRangeQuery {
    #[serde(default)]
    pub min_price: f64,
    #[serde(default = "default_max_price")]
    pub max_price: f64,
    #[serde(default)]
    pub min_rating: f64,
    #[serde(default = "default_max_rating")]
    pub max_rating: f64,
}

fn default_max_price() -> f64 {
    10000.0
}

fn default_max_rating() -> f64 {
    5.0
}

impl From<HotelRangeQuery> for HotelFilter {
    fn from(query: HotelRangeQuery) -> Self {
        Self {
            rating_min: query.min_rating,
            rating_max: query.max_rating,
            price_min: Some(query.min_price),
            price_max: Some(query.max_price),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HotelPage {
    pub data: Vec<HotelListing>,
    pub total: i64,
}

/// Fetches all hotels for a city from the scraper and stores them
pub async fn ingest(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<CityQuery>,
) -> AppResult<Json<Value>> {
    tracing::info!(request_id = %request_id, city = %query.city, "Ingesting hotels");

    let count = ingestion::ingest_hotels(
        state.listing_source.as_ref(),
        state.hotels.as_ref(),
        &query.city,
    )
    .await?;

    Ok(Json(json!({
        "message": format!("Fetched and saved {} hotels for {}", count, query.city)
    })))
}

/// Hotels by rating range and optional price range, with a total match count
pub async fn filter(
    State(state): State<Arc<AppState>>,
    Json(filter): Json<HotelFilter>,
) -> AppResult<Json<HotelPage>> {
    let total = state.hotels.count_hotels(&filter).await?;
    let hotels = state.hotels.filter_hotels(&filter).await?;

    Ok(Json(HotelPage {
        data: hotels.into_iter().map(HotelListing::from).collect(),
        total,
    }))
}

/// Hotels by price and rating range given as query parameters
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HotelRangeQuery>,
) -> AppResult<Json<HotelPage>> {
    let filter = HotelFilter::from(query);
    let data: Vec<HotelListing> = state
        .hotels
        .filter_hotels(&filter)
        .await?
        .into_iter()
        .map(HotelListing::from)
        .collect();

    Ok(Json(HotelPage {
        total: data.len() as i64,
        data,
    }))
}
