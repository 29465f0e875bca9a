//! Polygon validity checks used before overlap computation

use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{Contains, Coord, Line, LineString, Polygon};

use crate::models::{Geometry, Position};

/// Validation result with details
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

/// Validation error with location details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub location: String,
    pub reason: String,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid() -> Self {
        Self { is_valid: true, errors: Vec::new() }
    }

    /// Add an error to the result
    pub fn add_error(&mut self, location: String, reason: String) {
        self.is_valid = false;
        self.errors.push(ValidationError { location, reason });
    }

    fn merge_prefixed(&mut self, prefix: &str, other: ValidationResult) {
        for error in other.errors {
            self.add_error(format!("{}.{}", prefix, error.location), error.reason);
        }
    }
}

/// Validate a polygonal geometry.
///
/// Non-polygonal geometries are reported invalid: only Polygon and
/// MultiPolygon take part in overlap detection.
pub fn validate_polygonal(geometry: &Geometry) -> ValidationResult {
    match geometry {
        Geometry::Polygon { coordinates } => validate_polygon(coordinates),
        Geometry::MultiPolygon { coordinates } => {
            let mut result = ValidationResult::valid();
            if coordinates.is_empty() {
                result.add_error("MultiPolygon".to_string(), "MultiPolygon has no polygons".to_string());
            }
            for (i, polygon) in coordinates.iter().enumerate() {
                result.merge_prefixed(&format!("MultiPolygon[{}]", i), validate_polygon(polygon));
            }
            result
        }
        other => {
            let mut result = ValidationResult::valid();
            result.add_error(
                other.geometry_type().to_string(),
                "Expected Polygon or MultiPolygon".to_string(),
            );
            result
        }
    }
}

/// Shorthand for `validate_polygonal(geometry).is_valid`
pub fn is_valid_polygon(geometry: &Geometry) -> bool {
    validate_polygonal(geometry).is_valid
}

fn validate_polygon(rings: &[Vec<Position>]) -> ValidationResult {
    let mut result = ValidationResult::valid();

    if rings.is_empty() {
        result.add_error("Polygon".to_string(), "Polygon has no exterior ring".to_string());
        return result;
    }

    for (i, ring) in rings.iter().enumerate() {
        let location = if i == 0 {
            "Polygon exterior".to_string()
        } else {
            format!("Polygon interior[{}]", i - 1)
        };
        validate_ring(&location, ring, &mut result);
    }

    if result.is_valid {
        check_holes_inside(rings, &mut result);
    }

    result
}

/// Every hole must lie within the exterior ring; touching it is allowed.
fn check_holes_inside(rings: &[Vec<Position>], result: &mut ValidationResult) {
    let Some((exterior, holes)) = rings.split_first() else {
        return;
    };
    let shell = Polygon::new(to_line_string(exterior), vec![]);

    for (i, hole) in holes.iter().enumerate() {
        if !shell.contains(&to_line_string(hole)) {
            result.add_error(
                format!("Polygon interior[{}]", i),
                "Hole is not inside the exterior ring".to_string(),
            );
        }
    }
}

fn to_line_string(ring: &[Position]) -> LineString {
    LineString::new(ring.iter().map(|p| Coord { x: p[0], y: p[1] }).collect())
}

fn validate_ring(location: &str, ring: &[Position], result: &mut ValidationResult) {
    if ring.iter().any(|p| !p[0].is_finite() || !p[1].is_finite()) {
        result.add_error(location.to_string(), "Coordinates must be finite".to_string());
        return;
    }

    if ring.len() < 4 {
        result.add_error(
            location.to_string(),
            format!("Ring must have at least 4 positions, found {}", ring.len()),
        );
        return;
    }

    if ring.first() != ring.last() {
        result.add_error(
            location.to_string(),
            "Ring must be closed (first position == last position)".to_string(),
        );
        return;
    }

    if ring_self_intersects(ring) {
        result.add_error(location.to_string(), "Ring self-intersects".to_string());
    }
}

/// True when two non-adjacent edges of a closed ring touch or cross.
/// Zero-length edges from repeated positions are ignored.
fn ring_self_intersects(ring: &[Position]) -> bool {
    let edges: Vec<Line> = ring
        .windows(2)
        .filter(|w| w[0] != w[1])
        .map(|w| Line::new(Coord { x: w[0][0], y: w[0][1] }, Coord { x: w[1][0], y: w[1][1] }))
        .collect();

    let n = edges.len();
    if n < 3 {
        return true;
    }

    for i in 0..n {
        for j in (i + 1)..n {
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            match line_intersection(edges[i], edges[j]) {
                None => {}
                Some(LineIntersection::SinglePoint { .. }) if adjacent => {}
                Some(_) => return true,
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Geometry {
        Geometry::polygon(vec![vec![
            [0.0, 0.0],
            [10.0, 0.0],
            [10.0, 10.0],
            [0.0, 10.0],
            [0.0, 0.0],
        ]])
    }

    #[test]
    fn test_valid_square() {
        let result = validate_polygonal(&square());
        assert!(result.is_valid, "{:?}", result.errors);
    }

    #[test]
    fn test_bowtie_is_invalid() {
        let bowtie = Geometry::polygon(vec![vec![
            [0.0, 0.0],
            [10.0, 10.0],
            [10.0, 0.0],
            [0.0, 10.0],
            [0.0, 0.0],
        ]]);
        let result = validate_polygonal(&bowtie);
        assert!(!result.is_valid);
        assert_eq!(result.errors[0].reason, "Ring self-intersects");
    }

    #[test]
    fn test_unclosed_ring_is_invalid() {
        let open = Geometry::polygon(vec![vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]]);
        assert!(!is_valid_polygon(&open));
    }

    #[test]
    fn test_too_few_positions() {
        let sliver = Geometry::polygon(vec![vec![[0.0, 0.0], [10.0, 0.0], [0.0, 0.0]]]);
        assert!(!is_valid_polygon(&sliver));
    }

    #[test]
    fn test_non_finite_coordinates() {
        let nan = Geometry::polygon(vec![vec![
            [0.0, 0.0],
            [f64::NAN, 0.0],
            [10.0, 10.0],
            [0.0, 0.0],
        ]]);
        assert!(!is_valid_polygon(&nan));
    }

    #[test]
    fn test_repeated_vertex_is_tolerated() {
        let repeated = Geometry::polygon(vec![vec![
            [0.0, 0.0],
            [10.0, 0.0],
            [10.0, 0.0],
            [10.0, 10.0],
            [0.0, 10.0],
            [0.0, 0.0],
        ]]);
        assert!(is_valid_polygon(&repeated));
    }

    #[test]
    fn test_multipolygon_error_location() {
        let bad = Geometry::multi_polygon(vec![
            vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]],
            vec![vec![[5.0, 5.0], [6.0, 5.0]]],
        ]);
        let result = validate_polygonal(&bad);
        assert!(!result.is_valid);
        assert!(result.errors[0].location.starts_with("MultiPolygon[1]"));
    }

    #[test]
    fn test_hole_inside_exterior_is_valid() {
        let framed = Geometry::polygon(vec![
            vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]],
            vec![[2.0, 2.0], [4.0, 2.0], [4.0, 4.0], [2.0, 4.0], [2.0, 2.0]],
        ]);
        let result = validate_polygonal(&framed);
        assert!(result.is_valid, "{:?}", result.errors);
    }

    #[test]
    fn test_hole_crossing_exterior_is_invalid() {
        let crossing = Geometry::polygon(vec![
            vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]],
            vec![[5.0, 5.0], [15.0, 5.0], [15.0, 8.0], [5.0, 8.0], [5.0, 5.0]],
        ]);
        let result = validate_polygonal(&crossing);
        assert!(!result.is_valid);
        assert_eq!(result.errors[0].location, "Polygon interior[0]");
        assert_eq!(result.errors[0].reason, "Hole is not inside the exterior ring");

        let outside = Geometry::polygon(vec![
            vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]],
            vec![[20.0, 20.0], [22.0, 20.0], [22.0, 22.0], [20.0, 20.0]],
        ]);
        assert!(!is_valid_polygon(&outside));
    }

    #[test]
    fn test_non_polygonal_is_invalid() {
        assert!(!is_valid_polygon(&Geometry::point(0.0, 0.0)));
    }
}
