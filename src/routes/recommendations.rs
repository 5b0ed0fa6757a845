use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::AppResult, middleware::request_id::RequestId, models::RecommendationResponse,
    routes::AppState, services::recommendations,
};

fn default_city() -> String {
    "New York".to_string()
}

fn default_limit() -> i64 {
    5
}

#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    pub session_id: String,
    #[serde(default = "default_city")]
    pub city: String,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsBody {
    pub recommendations: Vec<RecommendationResponse>,
}

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<RecommendQuery>,
) -> AppResult<Json<RecommendationsBody>> {
    tracing::info!(
        request_id = %request_id,
        session_id = %query.session_id,
        city = %query.city,
        limit = query.limit,
        "Processing recommendation request"
    );

    let recommendations = recommendations::recommend(
        state.clicks.as_ref(),
        state.hotels.as_ref(),
        &query.session_id,
        &query.city,
        query.limit,
    )
    .await?;

    Ok(Json(RecommendationsBody {
        recommendations: recommendations
            .into_iter()
            .map(RecommendationResponse::from)
            .collect(),
    }))
}
