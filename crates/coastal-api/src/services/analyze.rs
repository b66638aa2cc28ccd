use coastal_core::error::CoastalError;
use coastal_core::models::{CollectionQuery, Geometry, TrainingSpec, VisParams, YearRange};

use crate::dto::{AnalyzeRequest, AnalyzeResponse, LegendEntry};
use crate::error::ApiError;
use crate::state::AppState;

/// Layer name shown on the results map
const LAYER_NAME: &str = "Coastal Classification";

/// Service for the draw -> composite -> classify -> render flow
pub struct AnalyzeService;

impl AnalyzeService {
    /// Run a full analysis for a drawn region and year range.
    ///
    /// All input validation happens before the first engine call, so an
    /// invalid drawing never reaches the remote service.
    pub async fn execute(
        state: &AppState,
        request: &AnalyzeRequest,
    ) -> Result<AnalyzeResponse, ApiError> {
        let geometry = parse_drawn_geometry(&request.geometry)?;
        geometry.validate_analysis_region()?;

        let years = YearRange::new(request.start_year, request.end_year)?;

        let training = match &request.training_regions {
            Some(regions) => TrainingSpec::new(regions.clone())?,
            None => {
                let spec = TrainingSpec::reference();
                if !spec.overlaps_region(&geometry) {
                    tracing::warn!(
                        "Reference training set does not overlap the analysis region; \
                         the classifier is not specialized to this area"
                    );
                }
                spec
            }
        };

        let query = CollectionQuery::landsat(geometry, years);

        let composite = state.engine.composite(&query).await.map_err(|e| {
            tracing::error!(error = %e, "Compositing failed");
            ApiError::from(e)
        })?;

        let classified = state.engine.classify(&composite, &training).await.map_err(|e| {
            tracing::error!(error = %e, "Classification failed");
            ApiError::from(e)
        })?;

        let layer = state
            .engine
            .map_layer(&classified, &VisParams::default(), LAYER_NAME)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Rendering failed");
                ApiError::from(e)
            })?;

        Ok(AnalyzeResponse {
            classified_image: classified.0,
            layer,
            legend: LegendEntry::legend(),
            start_date: years.start_date(),
            end_date: years.end_date(),
        })
    }
}

/// Extract the typed geometry from the draw tool payload.
///
/// Accepts either a bare GeoJSON geometry or a full feature carrying one.
pub(crate) fn parse_drawn_geometry(
    value: &Option<serde_json::Value>,
) -> Result<Geometry, ApiError> {
    let value = value
        .as_ref()
        .filter(|v| !v.is_null())
        .ok_or(CoastalError::MissingGeometry)?;

    let geometry_value = value.get("geometry").unwrap_or(value);

    Geometry::from_geojson(geometry_value)
        .ok_or_else(|| ApiError::bad_request("Invalid drawn region! Please draw again."))
}
