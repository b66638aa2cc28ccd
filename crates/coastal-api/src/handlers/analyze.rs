use std::sync::Arc;

use axum::{extract::State, Json};

use crate::dto::{AnalyzeRequest, AnalyzeResponse};
use crate::error::ApiError;
use crate::services::AnalyzeService;
use crate::state::AppState;

pub async fn handle_analyze(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    tracing::info!(
        start_year = request.start_year,
        end_year = request.end_year,
        has_geometry = request.geometry.is_some(),
        custom_training = request.training_regions.is_some(),
        "Processing analyze request"
    );

    let response = AnalyzeService::execute(&state, &request).await?;

    Ok(Json(response))
}
