//! Imagery collection queries.
//!
//! Builds the filtered, cloud-masked collection specification that is
//! evaluated remotely by the imagery engine.

use serde::{Deserialize, Serialize};

use crate::error::{CoastalError, Result};
use crate::models::geometry::Geometry;

/// Landsat 8 Collection 2 Tier 1 Level 2 surface reflectance archive
pub const LANDSAT_COLLECTION: &str = "LANDSAT/LC08/C02/T1_L2";

/// First year covered by the selectable archive window
pub const MIN_YEAR: i32 = 1984;

/// Last year covered by the selectable archive window
pub const MAX_YEAR: i32 = 2023;

/// QA_PIXEL bit flagging cloud
const QA_CLOUD_BIT: u16 = 3;

/// QA_PIXEL bit flagging cloud shadow
const QA_CLOUD_SHADOW_BIT: u16 = 4;

/// Opaque handle to an image materialized on the remote engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef(pub String);

impl ImageRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// Inclusive year range selected in the parameter panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    /// Create a validated year range.
    ///
    /// Both years must fall inside the archive window and the start year
    /// must not be after the end year.
    pub fn new(start: i32, end: i32) -> Result<Self> {
        for year in [start, end] {
            if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
                return Err(CoastalError::YearOutOfRange {
                    year,
                    min: MIN_YEAR,
                    max: MAX_YEAR,
                });
            }
        }

        if start > end {
            return Err(CoastalError::InvalidYearRange { start, end });
        }

        Ok(Self { start, end })
    }

    /// First day of the window: `{start}-01-01`
    pub fn start_date(&self) -> String {
        format!("{}-01-01", self.start)
    }

    /// Last day of the window: `{end}-12-31`
    pub fn end_date(&self) -> String {
        format!("{}-12-31", self.end)
    }
}

/// Per-pixel cloud mask over QA flag bits.
///
/// A pixel is excluded when any of the listed bits is set in its QA word.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudMask {
    pub qa_band: String,
    pub exclude_bits: Vec<u16>,
}

impl Default for CloudMask {
    fn default() -> Self {
        Self {
            qa_band: "QA_PIXEL".to_string(),
            exclude_bits: vec![QA_CLOUD_BIT, QA_CLOUD_SHADOW_BIT],
        }
    }
}

impl CloudMask {
    /// Whether a pixel with the given QA word survives the mask
    pub fn retains(&self, qa: u16) -> bool {
        self.exclude_bits.iter().all(|&bit| qa & (1 << bit) == 0)
    }
}

/// Whether a QA_PIXEL word marks a clear pixel (no cloud, no cloud shadow)
pub fn is_clear_pixel(qa: u16) -> bool {
    CloudMask::default().retains(qa)
}

/// Pixel reducer applied when compositing the masked collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Reducer {
    #[default]
    Median,
}

/// A filtered, cloud-masked image collection specification.
///
/// This is the request the engine evaluates; nothing is materialized
/// locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionQuery {
    pub collection_id: String,
    pub geometry: Geometry,
    pub start_date: String,
    pub end_date: String,
    pub cloud_mask: CloudMask,
    pub reducer: Reducer,
}

impl CollectionQuery {
    /// Build the standard Landsat query for a drawn region and year range
    pub fn landsat(geometry: Geometry, years: YearRange) -> Self {
        Self {
            collection_id: LANDSAT_COLLECTION.to_string(),
            start_date: years.start_date(),
            end_date: years.end_date(),
            geometry,
            cloud_mask: CloudMask::default(),
            reducer: Reducer::Median,
        }
    }
}
