//! Canonical geometry types used across all parcel crates.
//!
//! These types map one-to-one onto GeoJSON geometry objects. Coordinates are
//! stored in GeoJSON order (`[longitude, latitude]`); the editor works with
//! [`LatLng`] pairs and converts at this boundary.

use serde::{Deserialize, Serialize};

use crate::error::{ParcelError, Result};

/// A GeoJSON position, `[longitude, latitude]`
pub type Position = [f64; 2];

/// A latitude/longitude pair as used by map views and vertex handles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Build from a GeoJSON `[lng, lat]` position
    pub fn from_position(position: Position) -> Self {
        Self { lat: position[1], lng: position[0] }
    }

    /// Convert back to a GeoJSON `[lng, lat]` position
    pub fn to_position(self) -> Position {
        [self.lng, self.lat]
    }

    /// Euclidean distance in degrees
    pub fn distance_to(self, other: LatLng) -> f64 {
        let dlat = self.lat - other.lat;
        let dlng = self.lng - other.lng;
        (dlat * dlat + dlng * dlng).sqrt()
    }
}

/// Geometry type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryType {
    Point,
    LineString,
    Polygon,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
}

impl GeometryType {
    /// Parse a GeoJSON `type` member
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Point" => Some(GeometryType::Point),
            "LineString" => Some(GeometryType::LineString),
            "Polygon" => Some(GeometryType::Polygon),
            "MultiLineString" => Some(GeometryType::MultiLineString),
            "MultiPolygon" => Some(GeometryType::MultiPolygon),
            "GeometryCollection" => Some(GeometryType::GeometryCollection),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GeometryType::Point => "Point",
            GeometryType::LineString => "LineString",
            GeometryType::Polygon => "Polygon",
            GeometryType::MultiLineString => "MultiLineString",
            GeometryType::MultiPolygon => "MultiPolygon",
            GeometryType::GeometryCollection => "GeometryCollection",
        }
    }

    /// Rank used when picking the editable member of a collection.
    /// Higher wins; collections never win over a concrete type.
    pub fn edit_priority(&self) -> u8 {
        match self {
            GeometryType::MultiPolygon => 5,
            GeometryType::Polygon => 4,
            GeometryType::MultiLineString => 3,
            GeometryType::LineString => 2,
            GeometryType::Point => 1,
            GeometryType::GeometryCollection => 0,
        }
    }
}

impl std::fmt::Display for GeometryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// GeoJSON-compatible geometry representation
///
/// Closed over the six geometry kinds the parcel tooling understands. Any other
/// GeoJSON `type` is rejected by [`Geometry::from_geojson`] as unsupported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point {
        coordinates: Position,
    },
    LineString {
        coordinates: Vec<Position>,
    },
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiLineString {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    GeometryCollection {
        geometries: Vec<Geometry>,
    },
}

impl Geometry {
    /// Create a Point geometry
    pub fn point(x: f64, y: f64) -> Self {
        Geometry::Point { coordinates: [x, y] }
    }

    /// Create a LineString geometry
    pub fn line_string(coords: Vec<Position>) -> Self {
        Geometry::LineString { coordinates: coords }
    }

    /// Create a Polygon geometry
    pub fn polygon(rings: Vec<Vec<Position>>) -> Self {
        Geometry::Polygon { coordinates: rings }
    }

    /// Create a MultiLineString geometry
    pub fn multi_line_string(lines: Vec<Vec<Position>>) -> Self {
        Geometry::MultiLineString { coordinates: lines }
    }

    /// Create a MultiPolygon geometry
    pub fn multi_polygon(polygons: Vec<Vec<Vec<Position>>>) -> Self {
        Geometry::MultiPolygon { coordinates: polygons }
    }

    /// Create a GeometryCollection
    pub fn collection(geometries: Vec<Geometry>) -> Self {
        Geometry::GeometryCollection { geometries }
    }

    /// Get the geometry type
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point { .. } => GeometryType::Point,
            Geometry::LineString { .. } => GeometryType::LineString,
            Geometry::Polygon { .. } => GeometryType::Polygon,
            Geometry::MultiLineString { .. } => GeometryType::MultiLineString,
            Geometry::MultiPolygon { .. } => GeometryType::MultiPolygon,
            Geometry::GeometryCollection { .. } => GeometryType::GeometryCollection,
        }
    }

    /// True for Polygon and MultiPolygon
    pub fn is_polygonal(&self) -> bool {
        matches!(self, Geometry::Polygon { .. } | Geometry::MultiPolygon { .. })
    }

    /// Every Polygon/MultiPolygon in this geometry, looking one level into collections
    pub fn polygonal_parts(&self) -> Vec<&Geometry> {
        match self {
            Geometry::Polygon { .. } | Geometry::MultiPolygon { .. } => vec![self],
            Geometry::GeometryCollection { geometries } => {
                geometries.iter().filter(|g| g.is_polygonal()).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Visit every position in the geometry, including hole rings and collection members
    pub fn for_each_position(&self, f: &mut impl FnMut(Position)) {
        match self {
            Geometry::Point { coordinates } => f(*coordinates),
            Geometry::LineString { coordinates } => coordinates.iter().copied().for_each(f),
            Geometry::Polygon { coordinates } | Geometry::MultiLineString { coordinates } => {
                coordinates.iter().flatten().copied().for_each(f)
            }
            Geometry::MultiPolygon { coordinates } => {
                coordinates.iter().flatten().flatten().copied().for_each(f)
            }
            Geometry::GeometryCollection { geometries } => {
                for geometry in geometries {
                    geometry.for_each_position(f);
                }
            }
        }
    }

    /// Parse from a serde_json::Value (GeoJSON)
    ///
    /// An unknown `type` yields [`ParcelError::UnsupportedGeometry`]; a known type
    /// with a broken payload yields [`ParcelError::MalformedGeometry`]. Unsupported
    /// members of a GeometryCollection are dropped with a warning.
    pub fn from_geojson(value: &serde_json::Value) -> Result<Self> {
        let kind = value.get("type").and_then(|t| t.as_str()).ok_or_else(|| {
            ParcelError::MalformedGeometry { reason: "missing string member `type`".to_string() }
        })?;

        match GeometryType::from_name(kind) {
            None => Err(ParcelError::UnsupportedGeometry { kind: kind.to_string() }),
            Some(GeometryType::GeometryCollection) => {
                let members = value.get("geometries").and_then(|g| g.as_array()).ok_or_else(|| {
                    ParcelError::MalformedGeometry {
                        reason: "GeometryCollection without `geometries` array".to_string(),
                    }
                })?;

                let mut geometries = Vec::with_capacity(members.len());
                for member in members {
                    match Geometry::from_geojson(member) {
                        Ok(geometry) => geometries.push(geometry),
                        Err(ParcelError::UnsupportedGeometry { kind }) => {
                            tracing::warn!(kind = %kind, "Dropping unsupported collection member");
                        }
                        Err(e) => return Err(e),
                    }
                }
                Ok(Geometry::GeometryCollection { geometries })
            }
            Some(_) => serde_json::from_value(value.clone())
                .map_err(|e| ParcelError::MalformedGeometry { reason: e.to_string() }),
        }
    }

    /// Convert to serde_json::Value (GeoJSON)
    pub fn to_geojson(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Pick the editable member of a collection.
///
/// Priority is `MultiPolygon > Polygon > MultiLineString > LineString > Point`;
/// the first member of the winning type is returned. When no member has one of
/// those types the first member is returned.
pub fn select_primary(members: &[Geometry]) -> Option<&Geometry> {
    let best = members
        .iter()
        .enumerate()
        .max_by_key(|(idx, g)| (g.geometry_type().edit_priority(), std::cmp::Reverse(*idx)))
        .map(|(_, g)| g)?;

    if best.geometry_type().edit_priority() == 0 {
        members.first()
    } else {
        Some(best)
    }
}
