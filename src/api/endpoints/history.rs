//! Assessment history endpoints.

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ClearedResponse, HistoryQuery, HistoryResponse};

/// `GET /api/history?limit=N`: most recent first.
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let records = ctx.core.history_list(query.limit)?;
    let total = ctx.core.history_len()?;
    Ok(Json(HistoryResponse { total, records }))
}

/// `GET /api/history/latest`: pretty JSON of the newest record.
pub async fn latest(State(ctx): State<ApiContext>) -> Result<Response, ApiError> {
    let json = ctx
        .core
        .latest_history_json()?
        .ok_or_else(|| ApiError::NotFound("History is empty".into()))?;
    Ok(([(header::CONTENT_TYPE, "application/json")], json).into_response())
}

/// `GET /api/history/export.csv`
pub async fn export_csv(State(ctx): State<ApiContext>) -> Result<Response, ApiError> {
    let export = ctx.core.export_history_csv()?;
    let disposition = format!("attachment; filename=\"{}\"", export.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.content,
    )
        .into_response())
}

/// `DELETE /api/history`
pub async fn clear(State(ctx): State<ApiContext>) -> Result<Json<ClearedResponse>, ApiError> {
    let removed = ctx.core.clear_history()?;
    Ok(Json(ClearedResponse { removed }))
}
