//! Form submission and the sample form.

use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::core_state::Assessment;
use crate::models::PatientForm;

/// `POST /api/assess`: validate, predict and record a form.
pub async fn submit(
    State(ctx): State<ApiContext>,
    Json(form): Json<PatientForm>,
) -> Result<Json<Assessment>, ApiError> {
    Ok(Json(ctx.core.assess(form).await?))
}

/// `GET /api/form/sample`
pub async fn sample(State(ctx): State<ApiContext>) -> Json<PatientForm> {
    Json(ctx.core.sample_form())
}
