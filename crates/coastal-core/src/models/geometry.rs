//! Drawn-region geometry types.
//!
//! These types bridge the GeoJSON payloads produced by the browser map's
//! draw tool and the `geo` crate types used for local spatial checks.

use geo::{Coord, Intersects, LineString, Polygon as GeoPolygon};
use serde::{Deserialize, Serialize};

use crate::error::{CoastalError, Result};

/// Geometry type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryType {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
}

impl GeometryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryType::Point => "Point",
            GeometryType::LineString => "LineString",
            GeometryType::Polygon => "Polygon",
            GeometryType::MultiPoint => "MultiPoint",
            GeometryType::MultiLineString => "MultiLineString",
            GeometryType::MultiPolygon => "MultiPolygon",
        }
    }
}

/// GeoJSON-compatible geometry representation
///
/// Directly maps to GeoJSON geometry types with coordinate arrays, so the
/// draw tool's `last_drawing` payload deserializes into it unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point {
        coordinates: [f64; 2],
    },
    LineString {
        coordinates: Vec<[f64; 2]>,
    },
    Polygon {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPoint {
        coordinates: Vec<[f64; 2]>,
    },
    MultiLineString {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<[f64; 2]>>>,
    },
}

impl Geometry {
    /// Create a Polygon geometry from coordinate rings
    pub fn polygon(rings: Vec<Vec<[f64; 2]>>) -> Self {
        Geometry::Polygon { coordinates: rings }
    }

    /// Create an axis-aligned rectangle polygon from corner coordinates
    pub fn rectangle(min_lng: f64, min_lat: f64, max_lng: f64, max_lat: f64) -> Self {
        Geometry::polygon(vec![vec![
            [min_lng, min_lat],
            [max_lng, min_lat],
            [max_lng, max_lat],
            [min_lng, max_lat],
            [min_lng, min_lat],
        ]])
    }

    /// Get the geometry type
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point { .. } => GeometryType::Point,
            Geometry::LineString { .. } => GeometryType::LineString,
            Geometry::Polygon { .. } => GeometryType::Polygon,
            Geometry::MultiPoint { .. } => GeometryType::MultiPoint,
            Geometry::MultiLineString { .. } => GeometryType::MultiLineString,
            Geometry::MultiPolygon { .. } => GeometryType::MultiPolygon,
        }
    }

    /// Try to parse from a serde_json::Value (GeoJSON)
    pub fn from_geojson(value: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    /// Convert to serde_json::Value (GeoJSON)
    pub fn to_geojson(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Validate this geometry as an analysis region.
    ///
    /// Only polygons are accepted. The outer ring must be a closed ring
    /// with at least four positions.
    pub fn validate_analysis_region(&self) -> Result<()> {
        let rings = match self {
            Geometry::Polygon { coordinates } => coordinates,
            other => {
                return Err(CoastalError::UnsupportedGeometry {
                    found: other.geometry_type().as_str().to_string(),
                })
            }
        };

        let outer = rings.first().ok_or(CoastalError::MissingGeometry)?;

        if outer.len() < 4 {
            return Err(CoastalError::InvalidRing {
                reason: format!("outer ring has {} positions, need at least 4", outer.len()),
            });
        }

        if outer.first() != outer.last() {
            return Err(CoastalError::InvalidRing {
                reason: "outer ring is not closed".to_string(),
            });
        }

        Ok(())
    }

    /// Convert a polygon geometry to a `geo::Polygon` for spatial checks
    pub fn to_geo_polygon(&self) -> Option<GeoPolygon<f64>> {
        let rings = match self {
            Geometry::Polygon { coordinates } => coordinates,
            _ => return None,
        };

        let mut iter = rings.iter().map(|ring| {
            LineString::from(
                ring.iter().map(|&[x, y]| Coord { x, y }).collect::<Vec<_>>(),
            )
        });

        let exterior = iter.next()?;
        Some(GeoPolygon::new(exterior, iter.collect()))
    }

    /// Whether two polygon geometries overlap
    pub fn intersects(&self, other: &Geometry) -> bool {
        match (self.to_geo_polygon(), other.to_geo_polygon()) {
            (Some(a), Some(b)) => a.intersects(&b),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Geometry {
        Geometry::rectangle(0.0, 0.0, 1.0, 1.0)
    }

    #[test]
    fn test_polygon_serialization_round_trip() {
        let polygon = unit_square();
        let json = serde_json::to_string(&polygon).unwrap();
        assert!(json.contains("Polygon"));

        let parsed: Geometry = serde_json::from_str(&json).unwrap();
        assert_eq!(polygon, parsed);
    }

    #[test]
    fn test_valid_polygon_accepted() {
        assert!(unit_square().validate_analysis_region().is_ok());
    }

    #[test]
    fn test_point_rejected_as_unsupported() {
        let point = Geometry::Point { coordinates: [121.0, 31.0] };
        let err = point.validate_analysis_region().unwrap_err();
        assert!(matches!(
            err,
            CoastalError::UnsupportedGeometry { ref found } if found == "Point"
        ));
    }

    #[test]
    fn test_empty_polygon_rejected() {
        let empty = Geometry::polygon(vec![]);
        assert!(matches!(
            empty.validate_analysis_region(),
            Err(CoastalError::MissingGeometry)
        ));
    }

    #[test]
    fn test_open_ring_rejected() {
        let open = Geometry::polygon(vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]]);
        assert!(matches!(
            open.validate_analysis_region(),
            Err(CoastalError::InvalidRing { .. })
        ));
    }

    #[test]
    fn test_intersects_overlapping_rectangles() {
        let a = Geometry::rectangle(0.0, 0.0, 2.0, 2.0);
        let b = Geometry::rectangle(1.0, 1.0, 3.0, 3.0);
        let c = Geometry::rectangle(5.0, 5.0, 6.0, 6.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }
}
