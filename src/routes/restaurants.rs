use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{Restaurant, RestaurantFilter},
    routes::{hotels::CityQuery, AppState},
    services::ingestion,
};

#[derive(Debug, Serialize)]
pub struct RestaurantPage {
    pub data: Vec<Restaurant>,
    pub total: usize,
    pub page: i64,
    pub limit: i64,
}

/// Fetches restaurants for a city from the scraper and stores them
pub async fn ingest(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<CityQuery>,
) -> AppResult<Json<Value>> {
    tracing::info!(request_id = %request_id, city = %query.city, "Ingesting restaurants");

    let count = ingestion::ingest_restaurants(
        state.listing_source.as_ref(),
        state.restaurants.as_ref(),
        &query.city,
    )
    .await?;

    Ok(Json(json!({
        "message": format!("Fetched and saved {} restaurants for {}", count, query.city)
    })))
}

/// One page of restaurants by rating and price level
pub async fn filter(
    State(state): State<Arc<AppState>>,
    Json(filter): Json<RestaurantFilter>,
) -> AppResult<Json<RestaurantPage>> {
    // Validates paging before touching storage
    filter.offset()?;

    let data = state.restaurants.filter_restaurants(&filter).await?;

    Ok(Json(RestaurantPage {
        total: data.len(),
        page: filter.page,
        limit: filter.limit,
        data,
    }))
}
