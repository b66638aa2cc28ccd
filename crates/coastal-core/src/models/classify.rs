//! Land cover classification specification.
//!
//! The classifier itself runs remotely; these types describe the training
//! set, the model parameters, and the rendering palette that go into the
//! request.

use serde::{Deserialize, Serialize};

use crate::error::{CoastalError, Result};
use crate::models::geometry::Geometry;

/// Surface reflectance bands used for training and classification
pub const SPECTRAL_BANDS: [&str; 6] = ["SR_B2", "SR_B3", "SR_B4", "SR_B5", "SR_B6", "SR_B7"];

/// Feature property carrying the class label
pub const LABEL_PROPERTY: &str = "landcover";

/// Render palette keyed to class ids 0..3
pub const CLASS_PALETTE: [&str; 4] = ["#0000FF", "#FFD700", "#008000", "#FF0000"];

/// Sample pixels drawn per training region
const SAMPLES_PER_REGION: u32 = 100;

/// Sampling scale in meters (Landsat native resolution)
const SAMPLE_SCALE: u32 = 30;

/// Year of the global composite the default training set samples
const TRAINING_COMPOSITE_YEAR: i32 = 2020;

/// Land cover classes, in palette order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LandCoverClass {
    Water,
    Sand,
    Vegetation,
    Urban,
}

impl LandCoverClass {
    pub const ALL: [LandCoverClass; 4] = [
        LandCoverClass::Water,
        LandCoverClass::Sand,
        LandCoverClass::Vegetation,
        LandCoverClass::Urban,
    ];

    /// Integer class id used as the label value
    pub fn class_id(&self) -> u8 {
        match self {
            LandCoverClass::Water => 0,
            LandCoverClass::Sand => 1,
            LandCoverClass::Vegetation => 2,
            LandCoverClass::Urban => 3,
        }
    }

    /// Render color for this class
    pub fn color(&self) -> &'static str {
        CLASS_PALETTE[self.class_id() as usize]
    }

    pub fn label(&self) -> &'static str {
        match self {
            LandCoverClass::Water => "water",
            LandCoverClass::Sand => "sand",
            LandCoverClass::Vegetation => "vegetation",
            LandCoverClass::Urban => "urban",
        }
    }
}

/// A labeled rectangular region sampled for training
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingRegion {
    pub class: LandCoverClass,
    pub geometry: Geometry,
    pub sample_pixels: u32,
}

impl TrainingRegion {
    pub fn new(class: LandCoverClass, geometry: Geometry) -> Self {
        Self {
            class,
            geometry,
            sample_pixels: SAMPLES_PER_REGION,
        }
    }
}

/// Random forest model parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierSpec {
    pub trees: u32,
    pub bands: Vec<String>,
    pub label_property: String,
}

impl Default for ClassifierSpec {
    fn default() -> Self {
        Self {
            trees: 10,
            bands: SPECTRAL_BANDS.iter().map(|b| b.to_string()).collect(),
            label_property: LABEL_PROPERTY.to_string(),
        }
    }
}

/// Full training specification sent to the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSpec {
    /// Collection the training composite is built from
    pub collection_id: String,
    /// Year of the training composite
    pub composite_year: i32,
    pub sample_scale: u32,
    pub regions: Vec<TrainingRegion>,
    pub classifier: ClassifierSpec,
}

impl TrainingSpec {
    /// Build a training spec over the given labeled regions
    pub fn new(regions: Vec<TrainingRegion>) -> Result<Self> {
        if regions.is_empty() {
            return Err(CoastalError::EmptyTrainingSet);
        }

        Ok(Self {
            collection_id: super::collection::LANDSAT_COLLECTION.to_string(),
            composite_year: TRAINING_COMPOSITE_YEAR,
            sample_scale: SAMPLE_SCALE,
            regions,
            classifier: ClassifierSpec::default(),
        })
    }

    /// The fixed coastal-Florida reference training set.
    ///
    /// These rectangles are absolute; a model trained on them is not
    /// specialized to an arbitrary analysis region. `overlaps_region`
    /// lets callers detect that situation.
    pub fn reference_regions() -> Vec<TrainingRegion> {
        vec![
            TrainingRegion::new(
                LandCoverClass::Water,
                Geometry::rectangle(-80.0, 25.0, -79.5, 25.5),
            ),
            TrainingRegion::new(
                LandCoverClass::Sand,
                Geometry::rectangle(-80.5, 25.5, -80.0, 26.0),
            ),
            TrainingRegion::new(
                LandCoverClass::Vegetation,
                Geometry::rectangle(-81.0, 26.0, -80.5, 26.5),
            ),
            TrainingRegion::new(
                LandCoverClass::Urban,
                Geometry::rectangle(-81.5, 26.5, -81.0, 27.0),
            ),
        ]
    }

    /// Default spec over the reference training set
    pub fn reference() -> Self {
        Self {
            collection_id: super::collection::LANDSAT_COLLECTION.to_string(),
            composite_year: TRAINING_COMPOSITE_YEAR,
            sample_scale: SAMPLE_SCALE,
            regions: Self::reference_regions(),
            classifier: ClassifierSpec::default(),
        }
    }

    /// Whether any training region overlaps the given analysis polygon
    pub fn overlaps_region(&self, analysis: &Geometry) -> bool {
        self.regions.iter().any(|r| r.geometry.intersects(analysis))
    }
}

/// Visualization parameters for the classified raster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisParams {
    pub min: u8,
    pub max: u8,
    pub palette: Vec<String>,
}

impl Default for VisParams {
    fn default() -> Self {
        Self {
            min: 0,
            max: 3,
            palette: CLASS_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_order_is_blue_gold_green_red() {
        assert_eq!(LandCoverClass::Water.color(), "#0000FF");
        assert_eq!(LandCoverClass::Sand.color(), "#FFD700");
        assert_eq!(LandCoverClass::Vegetation.color(), "#008000");
        assert_eq!(LandCoverClass::Urban.color(), "#FF0000");
    }

    #[test]
    fn test_class_ids_match_palette_index() {
        for (i, class) in LandCoverClass::ALL.iter().enumerate() {
            assert_eq!(class.class_id() as usize, i);
            assert_eq!(class.color(), CLASS_PALETTE[i]);
        }
    }

    #[test]
    fn test_reference_spec_shape() {
        let spec = TrainingSpec::reference();
        assert_eq!(spec.regions.len(), 4);
        assert_eq!(spec.classifier.trees, 10);
        assert_eq!(spec.classifier.bands.len(), 6);
        assert_eq!(spec.classifier.label_property, "landcover");
        assert_eq!(spec.composite_year, 2020);
        assert!(spec.regions.iter().all(|r| r.sample_pixels == 100));
    }

    #[test]
    fn test_empty_training_set_rejected() {
        assert!(matches!(
            TrainingSpec::new(vec![]),
            Err(CoastalError::EmptyTrainingSet)
        ));
    }

    #[test]
    fn test_reference_regions_disjoint_from_remote_aoi() {
        let spec = TrainingSpec::reference();
        let shanghai = Geometry::rectangle(120.5, 30.5, 121.5, 31.5);
        let florida_coast = Geometry::rectangle(-80.2, 25.1, -79.8, 25.4);
        assert!(!spec.overlaps_region(&shanghai));
        assert!(spec.overlaps_region(&florida_coast));
    }

    #[test]
    fn test_default_vis_params() {
        let vis = VisParams::default();
        assert_eq!(vis.min, 0);
        assert_eq!(vis.max, 3);
        assert_eq!(vis.palette, vec!["#0000FF", "#FFD700", "#008000", "#FF0000"]);
    }
}
