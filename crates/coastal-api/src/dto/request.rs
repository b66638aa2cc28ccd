use serde::Deserialize;

use coastal_core::models::TrainingRegion;

/// Analyze request body.
///
/// `geometry` carries the draw tool's GeoJSON geometry verbatim; it is
/// validated server-side so a missing or non-polygon drawing is rejected
/// before any remote call.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub geometry: Option<serde_json::Value>,
    pub start_year: i32,
    pub end_year: i32,
    /// Custom labeled training regions; the fixed coastal-Florida
    /// reference set is used when absent
    #[serde(default)]
    pub training_regions: Option<Vec<TrainingRegion>>,
}

/// Export start request body
#[derive(Debug, Deserialize)]
pub struct ExportStartRequest {
    /// Classified image reference returned by the analyze endpoint
    pub image: String,
    /// Region to export, normally the analysis polygon
    pub region: Option<serde_json::Value>,
}
