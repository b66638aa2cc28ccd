use chrono::{DateTime, Utc};
use serde::Serialize;

use coastal_core::models::{ExportStatus, LandCoverClass, TaskState};
use coastal_engine::MapLayer;

/// One legend entry per land cover class
#[derive(Debug, Serialize)]
pub struct LegendEntry {
    pub class_id: u8,
    pub label: &'static str,
    pub color: &'static str,
}

impl LegendEntry {
    /// Legend for all classes, in palette order
    pub fn legend() -> Vec<LegendEntry> {
        LandCoverClass::ALL
            .iter()
            .map(|class| LegendEntry {
                class_id: class.class_id(),
                label: class.label(),
                color: class.color(),
            })
            .collect()
    }
}

/// Analyze operation response
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    /// Remote handle to the classified raster; pass it to the export
    /// endpoint to materialize it
    pub classified_image: String,
    /// Rendered tile layer for the results map
    pub layer: MapLayer,
    pub legend: Vec<LegendEntry>,
    pub start_date: String,
    pub end_date: String,
}

/// Export start response (202 Accepted)
#[derive(Debug, Serialize)]
pub struct ExportStartResponse {
    pub export_id: String,
    pub status: String,
    pub message: String,
}

impl ExportStartResponse {
    pub fn accepted(export_id: String) -> Self {
        Self {
            export_id,
            status: "accepted".to_string(),
            message: "Export submitted. Poll GET /api/v1/exports/{id} for progress.".to_string(),
        }
    }
}

/// Export status response
#[derive(Debug, Serialize)]
pub struct ExportStatusResponse {
    pub export_id: String,
    pub state: TaskState,
    pub message: String,
    pub polls: u32,
    pub updated_at: DateTime<Utc>,
}

impl From<ExportStatus> for ExportStatusResponse {
    fn from(status: ExportStatus) -> Self {
        Self {
            export_id: status.id.to_string(),
            state: status.state,
            message: status.message,
            polls: status.polls,
            updated_at: status.updated_at,
        }
    }
}

/// Cancel operation response
#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub success: bool,
    pub message: String,
}

impl CancelResponse {
    pub fn requested(export_id: &str) -> Self {
        Self {
            success: true,
            message: format!("Cancellation requested for export {}", export_id),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self { status: "ok", service: "coastal-api" }
    }
}
