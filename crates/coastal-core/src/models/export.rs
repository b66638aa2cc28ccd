//! Export task model.
//!
//! An export materializes the visualized classification raster to cloud
//! storage. The job runs remotely; locally we track its state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::classify::VisParams;
use crate::models::collection::ImageRef;
use crate::models::geometry::Geometry;

/// Export raster resolution in meters per pixel
pub const EXPORT_SCALE: u32 = 30;

/// Cloud storage folder exports land in
pub const EXPORT_FOLDER: &str = "GEE_Exports";

/// Filename prefix for exported rasters
pub const EXPORT_FILE_PREFIX: &str = "coastal_classified";

/// Local identifier for an export job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExportId(pub Uuid);

impl ExportId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ExportId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ExportId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Output raster format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RasterFormat {
    #[default]
    GeoTiff,
}

impl RasterFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            RasterFormat::GeoTiff => "GeoTIFF",
        }
    }
}

/// Export job submission sent to the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRequest {
    pub image: ImageRef,
    pub region: Geometry,
    pub vis: VisParams,
    pub format: RasterFormat,
    pub scale: u32,
    pub folder: String,
    pub file_prefix: String,
}

impl ExportRequest {
    /// Standard export of a classified image over its analysis region
    pub fn classified(image: ImageRef, region: Geometry) -> Self {
        Self {
            image,
            region,
            vis: VisParams::default(),
            format: RasterFormat::default(),
            scale: EXPORT_SCALE,
            folder: EXPORT_FOLDER.to_string(),
            file_prefix: EXPORT_FILE_PREFIX.to_string(),
        }
    }
}

/// Remote task state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    Submitted,
    Active,
    Completed,
    Failed,
    Cancelled,
}

impl TaskState {
    /// Terminal states end the polling loop
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Failed | TaskState::Cancelled
        )
    }
}

/// Snapshot of an export job's progress
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportStatus {
    pub id: ExportId,
    pub state: TaskState,
    pub message: String,
    /// Status probes issued so far
    pub polls: u32,
    pub updated_at: DateTime<Utc>,
}

impl ExportStatus {
    pub fn submitted(id: ExportId) -> Self {
        Self {
            id,
            state: TaskState::Submitted,
            message: format!(
                "Export submitted. Output will land in {}/{}.tif",
                EXPORT_FOLDER, EXPORT_FILE_PREFIX
            ),
            polls: 0,
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::geometry::Geometry;

    #[test]
    fn test_classified_export_defaults() {
        let request = ExportRequest::classified(
            ImageRef::new("img-1"),
            Geometry::rectangle(-80.2, 25.1, -79.8, 25.4),
        );

        assert_eq!(request.scale, 30);
        assert_eq!(request.folder, "GEE_Exports");
        assert_eq!(request.file_prefix, "coastal_classified");
        assert_eq!(request.format.as_str(), "GeoTIFF");
        assert_eq!(request.vis.palette.len(), 4);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!TaskState::Submitted.is_terminal());
        assert!(!TaskState::Active.is_terminal());
        assert!(TaskState::Completed.is_terminal());
        assert!(TaskState::Failed.is_terminal());
        assert!(TaskState::Cancelled.is_terminal());
    }

    #[test]
    fn test_submitted_status_starts_at_zero_polls() {
        let status = ExportStatus::submitted(ExportId::new());
        assert_eq!(status.state, TaskState::Submitted);
        assert_eq!(status.polls, 0);
    }
}
