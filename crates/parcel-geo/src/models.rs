//! Geometry models for parcel-geo.
//!
//! This module re-exports canonical types from `parcel-core` and converts
//! polygonal geometries to and from `geo` multipolygons.

// Re-export canonical types from parcel-core
pub use parcel_core::models::{Feature, Geometry, GeometryType, IntersectionRecord, LatLng, Position};

fn to_coord(p: &Position) -> geo::Coord {
    geo::Coord { x: p[0], y: p[1] }
}

fn to_line_string(coords: &[Position]) -> geo::LineString {
    geo::LineString::new(coords.iter().map(to_coord).collect())
}

fn to_polygon(rings: &[Vec<Position>]) -> geo::Polygon {
    match rings.split_first() {
        Some((exterior, interiors)) => geo::Polygon::new(
            to_line_string(exterior),
            interiors.iter().map(|ring| to_line_string(ring)).collect(),
        ),
        None => geo::Polygon::new(geo::LineString::new(vec![]), vec![]),
    }
}

fn polygon_rings(p: &geo::Polygon) -> Vec<Vec<Position>> {
    std::iter::once(p.exterior())
        .chain(p.interiors())
        .map(|ring| ring.coords().map(|c| [c.x, c.y]).collect())
        .collect()
}

/// Convert a polygonal Geometry to a geo::MultiPolygon.
///
/// Polygons become single-member multipolygons; anything else returns None.
pub fn to_multi_polygon(geom: &Geometry) -> Option<geo::MultiPolygon> {
    match geom {
        Geometry::Polygon { coordinates } => {
            Some(geo::MultiPolygon::new(vec![to_polygon(coordinates)]))
        }
        Geometry::MultiPolygon { coordinates } => Some(geo::MultiPolygon::new(
            coordinates.iter().map(|p| to_polygon(p)).collect(),
        )),
        _ => None,
    }
}

/// Convert a geo::MultiPolygon back, collapsing single-part results to a Polygon
pub fn from_multi_polygon(mp: &geo::MultiPolygon) -> Geometry {
    match mp.0.as_slice() {
        [single] => Geometry::Polygon { coordinates: polygon_rings(single) },
        parts => Geometry::MultiPolygon { coordinates: parts.iter().map(polygon_rings).collect() },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Geometry {
        Geometry::polygon(vec![vec![
            [0.0, 0.0],
            [2.0, 0.0],
            [2.0, 2.0],
            [0.0, 2.0],
            [0.0, 0.0],
        ]])
    }

    #[test]
    fn test_to_multi_polygon() {
        let mp = to_multi_polygon(&square()).unwrap();
        assert_eq!(mp.0.len(), 1);
        assert!(to_multi_polygon(&Geometry::point(0.0, 0.0)).is_none());
    }

    #[test]
    fn test_from_multi_polygon_collapses_single_part() {
        let mp = to_multi_polygon(&square()).unwrap();
        assert_eq!(from_multi_polygon(&mp), square());

        let two = geo::MultiPolygon::new(vec![mp.0[0].clone(), mp.0[0].clone()]);
        assert!(matches!(from_multi_polygon(&two), Geometry::MultiPolygon { .. }));
    }
}
