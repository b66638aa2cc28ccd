use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use coastal_core::models::ExportId;

use crate::dto::{CancelResponse, ExportStartRequest, ExportStartResponse, ExportStatusResponse};
use crate::error::ApiError;
use crate::services::ExportService;
use crate::state::AppState;

/// Start an export job (returns 202 Accepted)
pub async fn start_export(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExportStartRequest>,
) -> Result<(StatusCode, Json<ExportStartResponse>), ApiError> {
    tracing::info!(image = %request.image, "Starting export");

    let id = ExportService::start(state, &request).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(ExportStartResponse::accepted(id.to_string())),
    ))
}

/// Get the current status of an export job
pub async fn get_export_status(
    State(state): State<Arc<AppState>>,
    Path(export_id): Path<Uuid>,
) -> Result<Json<ExportStatusResponse>, ApiError> {
    let status = state.export_status(ExportId(export_id)).await?;
    Ok(Json(status.into()))
}

/// Request cancellation of a running export job
pub async fn cancel_export(
    State(state): State<Arc<AppState>>,
    Path(export_id): Path<Uuid>,
) -> Result<Json<CancelResponse>, ApiError> {
    tracing::info!(export_id = %export_id, "Cancelling export");

    state.request_cancel(ExportId(export_id)).await?;

    Ok(Json(CancelResponse::requested(&export_id.to_string())))
}
