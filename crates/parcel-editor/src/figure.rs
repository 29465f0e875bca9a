//! The active figure: an editable geometry split into parts of vertices.
//!
//! Polygon outer rings are stored without the closing position and closed
//! again whenever the figure is emitted, so insertions and deletions never
//! have to keep the first and last position in sync. Hole rings are carried
//! through untouched.

use std::fmt;

use parcel_core::models::{Geometry, GeometryType, LatLng, Position};
use parcel_core::{ParcelError, Result};
use parcel_geo::{project_onto_segment, SegmentProjection};
use serde::{Deserialize, Serialize};

/// Identifier of a loaded or drawn figure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FigureId(pub u64);

impl fmt::Display for FigureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "figure-{}", self.0)
    }
}

/// Geometry kinds the editor can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FigureKind {
    Point,
    LineString,
    Polygon,
    MultiLineString,
    MultiPolygon,
}

impl FigureKind {
    pub fn geometry_type(self) -> GeometryType {
        match self {
            FigureKind::Point => GeometryType::Point,
            FigureKind::LineString => GeometryType::LineString,
            FigureKind::Polygon => GeometryType::Polygon,
            FigureKind::MultiLineString => GeometryType::MultiLineString,
            FigureKind::MultiPolygon => GeometryType::MultiPolygon,
        }
    }

    /// True when parts are closed rings
    pub fn is_polygonal(self) -> bool {
        matches!(self, FigureKind::Polygon | FigureKind::MultiPolygon)
    }

    /// Fewest vertices a single part may keep
    pub fn min_vertices(self) -> usize {
        match self {
            FigureKind::Point => 1,
            FigureKind::LineString | FigureKind::MultiLineString => 2,
            FigureKind::Polygon | FigureKind::MultiPolygon => 3,
        }
    }
}

impl fmt::Display for FigureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.geometry_type())
    }
}

/// One line, or one polygon with its holes
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    vertices: Vec<LatLng>,
    holes: Vec<Vec<Position>>,
}

impl Part {
    fn line(positions: &[Position]) -> Self {
        Self { vertices: positions.iter().copied().map(LatLng::from_position).collect(), holes: Vec::new() }
    }

    fn polygon(rings: &[Vec<Position>]) -> Result<Self> {
        let (exterior, holes) = rings.split_first().ok_or_else(|| ParcelError::MalformedGeometry {
            reason: "Polygon without an exterior ring".to_string(),
        })?;

        let mut vertices: Vec<LatLng> = exterior.iter().copied().map(LatLng::from_position).collect();
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }

        Ok(Self { vertices, holes: holes.to_vec() })
    }

    /// Editable vertices; for polygons the closing position is implied
    pub fn vertices(&self) -> &[LatLng] {
        &self.vertices
    }

    pub fn holes(&self) -> &[Vec<Position>] {
        &self.holes
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    fn line_positions(&self) -> Vec<Position> {
        self.vertices.iter().map(|v| v.to_position()).collect()
    }

    fn polygon_rings(&self) -> Vec<Vec<Position>> {
        let mut exterior = self.line_positions();
        if let Some(first) = exterior.first().copied() {
            exterior.push(first);
        }
        std::iter::once(exterior).chain(self.holes.iter().cloned()).collect()
    }
}

/// Closest edge of a figure to a query position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeHit {
    pub part: usize,
    /// Index of the edge's start vertex
    pub start: usize,
    pub projection: SegmentProjection,
}

/// The geometry under edit
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    id: FigureId,
    kind: FigureKind,
    parts: Vec<Part>,
}

impl Figure {
    /// Build an editable figure from a concrete geometry.
    ///
    /// Collections must be unwrapped by the caller first. Parts below the
    /// kind's minimum vertex count and non-finite coordinates are rejected
    /// as malformed.
    pub fn from_geometry(id: FigureId, geometry: &Geometry) -> Result<Self> {
        let (kind, parts) = match geometry {
            Geometry::Point { coordinates } => (FigureKind::Point, vec![Part::line(&[*coordinates])]),
            Geometry::LineString { coordinates } => (FigureKind::LineString, vec![Part::line(coordinates)]),
            Geometry::Polygon { coordinates } => (FigureKind::Polygon, vec![Part::polygon(coordinates)?]),
            Geometry::MultiLineString { coordinates } => (
                FigureKind::MultiLineString,
                coordinates.iter().map(|line| Part::line(line)).collect(),
            ),
            Geometry::MultiPolygon { coordinates } => (
                FigureKind::MultiPolygon,
                coordinates.iter().map(|polygon| Part::polygon(polygon)).collect::<Result<Vec<_>>>()?,
            ),
            Geometry::GeometryCollection { .. } => {
                return Err(ParcelError::UnsupportedGeometry {
                    kind: GeometryType::GeometryCollection.to_string(),
                })
            }
        };

        if parts.is_empty() {
            return Err(ParcelError::MalformedGeometry {
                reason: format!("{} has no parts", kind),
            });
        }
        if let Some(short) = parts.iter().find(|p| p.len() < kind.min_vertices()) {
            return Err(ParcelError::MalformedGeometry {
                reason: format!(
                    "{} part has {} vertices, at least {} required",
                    kind,
                    short.len(),
                    kind.min_vertices()
                ),
            });
        }

        let finite = parts.iter().flat_map(|p| p.vertices.iter()).all(|v| v.lat.is_finite() && v.lng.is_finite());
        if !finite {
            return Err(ParcelError::MalformedGeometry {
                reason: format!("{} has non-finite coordinates", kind),
            });
        }

        Ok(Self { id, kind, parts })
    }

    /// Single-part figure from drawn vertices; polygon vertices must already be unclosed
    pub(crate) fn from_vertices(id: FigureId, kind: FigureKind, vertices: Vec<LatLng>) -> Self {
        Self { id, kind, parts: vec![Part { vertices, holes: Vec::new() }] }
    }

    pub fn id(&self) -> FigureId {
        self.id
    }

    pub fn kind(&self) -> FigureKind {
        self.kind
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn part(&self, index: usize) -> Option<&Part> {
        self.parts.get(index)
    }

    /// Total number of editable vertices across all parts
    pub fn vertex_count(&self) -> usize {
        self.parts.iter().map(Part::len).sum()
    }

    /// Edges of one part as `(start, end)` vertex indices.
    ///
    /// Polygon parts include the closing edge from the last vertex back to
    /// the first; line parts do not.
    pub fn edges(&self, part: usize) -> Vec<(usize, usize)> {
        let n = self.parts.get(part).map(Part::len).unwrap_or(0);
        if n < 2 {
            return Vec::new();
        }

        let mut edges: Vec<(usize, usize)> = (0..n - 1).map(|i| (i, i + 1)).collect();
        if self.kind.is_polygonal() && n >= 3 {
            edges.push((n - 1, 0));
        }
        edges
    }

    /// The edge closest to `p` across every part; the first one wins ties
    pub fn closest_edge(&self, p: LatLng) -> Option<EdgeHit> {
        let mut best: Option<EdgeHit> = None;

        for (part_idx, part) in self.parts.iter().enumerate() {
            for (start, end) in self.edges(part_idx) {
                let projection = project_onto_segment(p, part.vertices[start], part.vertices[end]);
                let closer = best.map_or(true, |b| projection.distance < b.projection.distance);
                if closer {
                    best = Some(EdgeHit { part: part_idx, start, projection });
                }
            }
        }

        best
    }

    pub(crate) fn set_vertex(&mut self, part: usize, index: usize, position: LatLng) -> bool {
        match self.parts.get_mut(part).and_then(|p| p.vertices.get_mut(index)) {
            Some(vertex) => {
                *vertex = position;
                true
            }
            None => false,
        }
    }

    pub(crate) fn insert_vertex(&mut self, part: usize, index: usize, position: LatLng) -> bool {
        match self.parts.get_mut(part) {
            Some(p) if index <= p.vertices.len() => {
                p.vertices.insert(index, position);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn remove_vertex(&mut self, part: usize, index: usize) -> Option<LatLng> {
        let p = self.parts.get_mut(part)?;
        (index < p.vertices.len()).then(|| p.vertices.remove(index))
    }

    /// Emit the figure as GeoJSON, closing polygon rings
    pub fn to_geometry(&self) -> Geometry {
        match self.kind {
            FigureKind::Point => Geometry::Point {
                coordinates: self
                    .parts
                    .first()
                    .and_then(|p| p.vertices.first())
                    .map(|v| v.to_position())
                    .unwrap_or_default(),
            },
            FigureKind::LineString => Geometry::LineString {
                coordinates: self.parts.first().map(Part::line_positions).unwrap_or_default(),
            },
            FigureKind::Polygon => Geometry::Polygon {
                coordinates: self.parts.first().map(Part::polygon_rings).unwrap_or_default(),
            },
            FigureKind::MultiLineString => Geometry::MultiLineString {
                coordinates: self.parts.iter().map(Part::line_positions).collect(),
            },
            FigureKind::MultiPolygon => Geometry::MultiPolygon {
                coordinates: self.parts.iter().map(Part::polygon_rings).collect(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Geometry {
        Geometry::polygon(vec![vec![[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0], [0.0, 0.0]]])
    }

    #[test]
    fn test_polygon_ring_is_stored_open() {
        let figure = Figure::from_geometry(FigureId(1), &square()).unwrap();
        assert_eq!(figure.kind(), FigureKind::Polygon);
        assert_eq!(figure.vertex_count(), 4);
        assert_eq!(figure.parts()[0].vertices()[1], LatLng::new(0.0, 4.0));
        assert_eq!(figure.to_geometry(), square());
    }

    #[test]
    fn test_holes_survive_roundtrip() {
        let with_hole = Geometry::polygon(vec![
            vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]],
            vec![[2.0, 2.0], [4.0, 2.0], [4.0, 4.0], [2.0, 2.0]],
        ]);
        let figure = Figure::from_geometry(FigureId(1), &with_hole).unwrap();
        assert_eq!(figure.parts()[0].holes().len(), 1);
        assert_eq!(figure.vertex_count(), 4);
        assert_eq!(figure.to_geometry(), with_hole);
    }

    #[test]
    fn test_multi_part_figures() {
        let lines = Geometry::multi_line_string(vec![
            vec![[0.0, 0.0], [1.0, 1.0]],
            vec![[5.0, 5.0], [6.0, 6.0], [7.0, 5.0]],
        ]);
        let figure = Figure::from_geometry(FigureId(2), &lines).unwrap();
        assert_eq!(figure.parts().len(), 2);
        assert_eq!(figure.vertex_count(), 5);
        assert_eq!(figure.to_geometry(), lines);
    }

    #[test]
    fn test_rejects_collection_and_empty() {
        let collection = Geometry::collection(vec![square()]);
        assert!(matches!(
            Figure::from_geometry(FigureId(1), &collection),
            Err(ParcelError::UnsupportedGeometry { .. })
        ));
        assert!(matches!(
            Figure::from_geometry(FigureId(1), &Geometry::line_string(vec![])),
            Err(ParcelError::MalformedGeometry { .. })
        ));
        assert!(matches!(
            Figure::from_geometry(FigureId(1), &Geometry::polygon(vec![])),
            Err(ParcelError::MalformedGeometry { .. })
        ));
    }

    #[test]
    fn test_rejects_parts_below_minimum() {
        let sliver = Geometry::polygon(vec![vec![[0.0, 0.0], [1.0, 0.0], [0.0, 0.0]]]);
        assert!(matches!(
            Figure::from_geometry(FigureId(1), &sliver),
            Err(ParcelError::MalformedGeometry { .. })
        ));

        let stub = Geometry::line_string(vec![[0.0, 0.0]]);
        assert!(Figure::from_geometry(FigureId(1), &stub).is_err());

        let mixed = Geometry::multi_line_string(vec![vec![[0.0, 0.0], [1.0, 1.0]], vec![[5.0, 5.0]]]);
        assert!(Figure::from_geometry(FigureId(1), &mixed).is_err());
    }

    #[test]
    fn test_rejects_non_finite() {
        let line = Geometry::line_string(vec![[0.0, 0.0], [f64::INFINITY, 1.0]]);
        assert!(Figure::from_geometry(FigureId(1), &line).is_err());
    }

    #[test]
    fn test_edges_include_closing_edge_for_polygons_only() {
        let polygon = Figure::from_geometry(FigureId(1), &square()).unwrap();
        assert_eq!(polygon.edges(0), vec![(0, 1), (1, 2), (2, 3), (3, 0)]);

        let line = Figure::from_geometry(
            FigureId(2),
            &Geometry::line_string(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]),
        )
        .unwrap();
        assert_eq!(line.edges(0), vec![(0, 1), (1, 2)]);
        assert!(line.edges(5).is_empty());
    }

    #[test]
    fn test_closest_edge() {
        let polygon = Figure::from_geometry(FigureId(1), &square()).unwrap();
        let hit = polygon.closest_edge(LatLng::new(0.1, 2.0)).unwrap();
        assert_eq!(hit.part, 0);
        assert_eq!(hit.start, 0);
        assert_eq!(hit.projection.point, LatLng::new(0.0, 2.0));

        // closing edge runs from (lat 4, lng 0) back to (lat 0, lng 0)
        let closing = polygon.closest_edge(LatLng::new(2.0, -0.5)).unwrap();
        assert_eq!(closing.start, 3);
    }

    #[test]
    fn test_point_has_no_edges() {
        let point = Figure::from_geometry(FigureId(1), &Geometry::point(3.0, 4.0)).unwrap();
        assert!(point.closest_edge(LatLng::new(0.0, 0.0)).is_none());
        assert_eq!(point.to_geometry(), Geometry::point(3.0, 4.0));
    }
}
