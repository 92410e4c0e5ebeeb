//! What-if scenario endpoints.

use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::{PatientForm, Scenario, ScenarioEdit};
use crate::scenario::ScenarioSnapshot;

/// `GET /api/scenario`
pub async fn current(State(ctx): State<ApiContext>) -> Json<ScenarioSnapshot> {
    Json(ctx.core.scenario())
}

/// `PUT /api/scenario`: partial edit of the risk factors.
pub async fn edit(
    State(ctx): State<ApiContext>,
    Json(edit): Json<ScenarioEdit>,
) -> Result<Json<ScenarioSnapshot>, ApiError> {
    Ok(Json(ctx.core.edit_scenario(&edit)?))
}

/// `POST /api/scenario`: replace the whole scenario.
pub async fn replace(
    State(ctx): State<ApiContext>,
    Json(scenario): Json<Scenario>,
) -> Result<Json<ScenarioSnapshot>, ApiError> {
    Ok(Json(ctx.core.replace_scenario(scenario)?))
}

/// `POST /api/scenario/reset`
pub async fn reset(State(ctx): State<ApiContext>) -> Result<Json<ScenarioSnapshot>, ApiError> {
    Ok(Json(ctx.core.reset_scenario()?))
}

/// `POST /api/scenario/apply`: returns the form with the scenario applied.
pub async fn apply(State(ctx): State<ApiContext>) -> Result<Json<PatientForm>, ApiError> {
    Ok(Json(ctx.core.apply_scenario()?))
}

/// `DELETE /api/scenario/error`
pub async fn dismiss_error(
    State(ctx): State<ApiContext>,
) -> Result<Json<ScenarioSnapshot>, ApiError> {
    Ok(Json(ctx.core.dismiss_scenario_error()?))
}
