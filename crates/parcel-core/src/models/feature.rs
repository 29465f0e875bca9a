use serde::{Deserialize, Serialize};

use super::Geometry;

/// A plot record as supplied by the surrounding application.
///
/// Only `geom` matters to the geometry code; everything else (region, status,
/// price, ...) rides along in `attributes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Plot code or other external identifier
    pub code: String,

    /// Geometry or GeometryCollection; None when absent or unsupported
    #[serde(alias = "geometry")]
    pub geom: Option<Geometry>,

    /// Descriptive attributes
    #[serde(default)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl Feature {
    /// Create a new feature with geometry
    pub fn with_geometry(code: impl Into<String>, geom: Geometry) -> Self {
        Self { code: code.into(), geom: Some(geom), attributes: serde_json::Map::new() }
    }

    /// Create a new feature without geometry
    pub fn without_geometry(code: impl Into<String>) -> Self {
        Self { code: code.into(), geom: None, attributes: serde_json::Map::new() }
    }

    /// Attach a descriptive attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Polygon/MultiPolygon geometries carried by this feature
    pub fn polygons(&self) -> Vec<&Geometry> {
        self.geom.as_ref().map(|g| g.polygonal_parts()).unwrap_or_default()
    }
}
