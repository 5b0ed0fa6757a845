use axum::{extract::State, Extension, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
    error::AppResult, middleware::request_id::RequestId, models::ClickEvent, routes::AppState,
    services::recommendations,
};

/// Handler for click logging. Repeating a click returns the same response.
pub async fn log_click(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(click): Json<ClickEvent>,
) -> AppResult<Json<Value>> {
    tracing::debug!(
        request_id = %request_id,
        session_id = %click.session_id,
        hotel_id = click.hotel_id,
        "Logging click"
    );

    recommendations::log_click(state.clicks.as_ref(), &click.session_id, click.hotel_id)
        .await?;

    Ok(Json(json!({ "status": "logged" })))
}
