use serde::{Deserialize, Serialize};

use super::Geometry;

/// Overlap between two polygons of one computation pass.
///
/// `id` is positional (`intersection-i-j`, `i < j`) and only meaningful for the
/// polygon list it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntersectionRecord {
    pub id: String,

    /// First contributing polygon, as it appeared in the input list
    pub polygon1: Geometry,

    /// Second contributing polygon
    pub polygon2: Geometry,

    /// Overlap geometry (Polygon or MultiPolygon)
    pub intersection: Geometry,

    /// Overlap area, in the units of the configured area method
    pub area: f64,

    /// Positions `(i, j)` of the two polygons in the input list
    pub sources: (usize, usize),
}

impl IntersectionRecord {
    /// Positional id for the pair `(i, j)`
    pub fn make_id(i: usize, j: usize) -> String {
        format!("intersection-{}-{}", i, j)
    }
}
