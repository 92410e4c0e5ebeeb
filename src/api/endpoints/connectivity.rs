//! Connectivity signal pushed by the host page (`online`/`offline` events).

use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ConnectivityRequest};
use crate::scenario::ScenarioSnapshot;

/// `PUT /api/connectivity`
pub async fn update(
    State(ctx): State<ApiContext>,
    Json(body): Json<ConnectivityRequest>,
) -> Result<Json<ScenarioSnapshot>, ApiError> {
    Ok(Json(ctx.core.set_online(body.online)?))
}
