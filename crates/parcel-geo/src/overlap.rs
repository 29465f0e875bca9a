//! Pairwise polygon overlap (encroachment) detection
//!
//! Every unordered pair of valid polygons is intersected; pairs with a
//! positive-area overlap produce an [`IntersectionRecord`]. Records can be
//! traced back to the plots they came from with [`find_source_features`].

use geo::{Area, BooleanOps, MultiPolygon};
use parcel_core::config::OverlapSettings;

use crate::index::PolygonIndex;
use crate::models::{from_multi_polygon, to_multi_polygon, Feature, Geometry, IntersectionRecord, Position};
use crate::spatial::measure_area;
use crate::validation::validate_polygonal;

/// Flatten features into the polygon list the detector works on.
///
/// Polygon and MultiPolygon geometries, including those inside a
/// GeometryCollection, are taken in feature order.
pub fn collect_polygons(features: &[Feature]) -> Vec<Geometry> {
    features.iter().flat_map(|f| f.polygons()).cloned().collect()
}

/// Computes intersection records for a polygon list
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlapDetector {
    settings: OverlapSettings,
}

impl OverlapDetector {
    pub fn new(settings: OverlapSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> OverlapSettings {
        self.settings
    }

    /// Intersect every pair `(i, j)`, `i < j`.
    ///
    /// Invalid or non-polygonal inputs are skipped for every pair they take
    /// part in. Records come out ordered by `(i, j)`.
    pub fn compute(&self, polygons: &[Geometry]) -> Vec<IntersectionRecord> {
        let prepared: Vec<Option<MultiPolygon>> = polygons
            .iter()
            .enumerate()
            .map(|(idx, geometry)| {
                let validation = validate_polygonal(geometry);
                if let Some(error) = validation.errors.first() {
                    tracing::debug!(
                        polygon = idx,
                        location = %error.location,
                        reason = %error.reason,
                        "Skipping invalid polygon in overlap detection"
                    );
                    return None;
                }
                to_multi_polygon(geometry)
            })
            .collect();

        let pairs = if self.settings.spatial_index {
            PolygonIndex::from_polygons(
                prepared.iter().enumerate().filter_map(|(idx, mp)| mp.as_ref().map(|mp| (idx, mp))),
            )
            .candidate_pairs()
        } else {
            exhaustive_pairs(&prepared)
        };

        let records: Vec<IntersectionRecord> = pairs
            .into_iter()
            .filter_map(|(i, j)| {
                let a = prepared[i].as_ref()?;
                let b = prepared[j].as_ref()?;
                self.intersect_pair(i, j, a, b, polygons)
            })
            .collect();

        tracing::info!(
            polygons = polygons.len(),
            valid = prepared.iter().filter(|p| p.is_some()).count(),
            intersections = records.len(),
            "Computed polygon overlaps"
        );

        records
    }

    fn intersect_pair(
        &self,
        i: usize,
        j: usize,
        a: &MultiPolygon,
        b: &MultiPolygon,
        polygons: &[Geometry],
    ) -> Option<IntersectionRecord> {
        let overlap = a.intersection(b);
        if overlap.0.is_empty() || overlap.unsigned_area() <= 0.0 {
            return None;
        }

        Some(IntersectionRecord {
            id: IntersectionRecord::make_id(i, j),
            polygon1: polygons[i].clone(),
            polygon2: polygons[j].clone(),
            intersection: from_multi_polygon(&overlap),
            area: measure_area(&overlap, self.settings.area_method),
            sources: (i, j),
        })
    }
}

fn exhaustive_pairs(prepared: &[Option<MultiPolygon>]) -> Vec<(usize, usize)> {
    let valid: Vec<usize> =
        prepared.iter().enumerate().filter(|(_, p)| p.is_some()).map(|(idx, _)| idx).collect();

    let mut pairs = Vec::new();
    for (k, &i) in valid.iter().enumerate() {
        for &j in &valid[k + 1..] {
            pairs.push((i, j));
        }
    }
    pairs
}

/// Coordinates of a polygonal geometry in MultiPolygon nesting
fn normalized_coordinates(geometry: &Geometry) -> Option<Vec<Vec<Vec<Position>>>> {
    match geometry {
        Geometry::Polygon { coordinates } => Some(vec![coordinates.clone()]),
        Geometry::MultiPolygon { coordinates } => Some(coordinates.clone()),
        _ => None,
    }
}

/// First feature carrying `polygon`.
///
/// Polygon and MultiPolygon are compared in MultiPolygon nesting, so a
/// Polygon matches a single-part MultiPolygon with the same rings. Ring
/// order and vertex order must match exactly.
pub fn find_source_feature<'a>(polygon: &Geometry, features: &'a [Feature]) -> Option<&'a Feature> {
    let target = normalized_coordinates(polygon)?;

    features.iter().find(|feature| {
        feature
            .polygons()
            .into_iter()
            .filter_map(normalized_coordinates)
            .any(|candidate| candidate == target)
    })
}

/// Resolve both sides of a record back to their features.
///
/// Either side is None when no feature matches any more, e.g. after the
/// feature list changed since the record was computed.
pub fn find_source_features<'a>(
    record: &IntersectionRecord,
    features: &'a [Feature],
) -> (Option<&'a Feature>, Option<&'a Feature>) {
    (
        find_source_feature(&record.polygon1, features),
        find_source_feature(&record.polygon2, features),
    )
}

/// Cached overlap results with a visibility toggle.
///
/// Recomputes only when the polygon list changes; showing or hiding the
/// layer never triggers a computation.
#[derive(Debug, Clone, Default)]
pub struct OverlapLayer {
    detector: OverlapDetector,
    input: Vec<Geometry>,
    records: Vec<IntersectionRecord>,
    visible: bool,
    computations: usize,
}

impl OverlapLayer {
    pub fn new(detector: OverlapDetector) -> Self {
        Self { detector, ..Default::default() }
    }

    /// Replace the polygon list. Returns true when a recomputation happened.
    pub fn update(&mut self, polygons: Vec<Geometry>) -> bool {
        if self.computations > 0 && polygons == self.input {
            return false;
        }

        self.records = self.detector.compute(&polygons);
        self.input = polygons;
        self.computations += 1;
        true
    }

    /// Replace the polygon list from features
    pub fn update_from_features(&mut self, features: &[Feature]) -> bool {
        self.update(collect_polygons(features))
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// All records of the current pass, regardless of visibility
    pub fn records(&self) -> &[IntersectionRecord] {
        &self.records
    }

    /// Records to draw: all of them when visible, none otherwise
    pub fn visible_records(&self) -> &[IntersectionRecord] {
        if self.visible {
            &self.records
        } else {
            &[]
        }
    }

    /// Look up a record of the current pass by id
    pub fn find(&self, id: &str) -> Option<&IntersectionRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Number of computations run so far
    pub fn computations(&self) -> usize {
        self.computations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcel_core::config::AreaMethod;

    fn square(x: f64, y: f64, size: f64) -> Geometry {
        Geometry::polygon(vec![vec![
            [x, y],
            [x + size, y],
            [x + size, y + size],
            [x, y + size],
            [x, y],
        ]])
    }

    fn planar(spatial_index: bool) -> OverlapDetector {
        OverlapDetector::new(OverlapSettings { area_method: AreaMethod::Planar, spatial_index })
    }

    #[test]
    fn test_two_overlapping_squares() {
        for spatial_index in [true, false] {
            let records = planar(spatial_index).compute(&[square(0.0, 0.0, 10.0), square(5.0, 5.0, 10.0)]);

            assert_eq!(records.len(), 1);
            assert_eq!(records[0].id, "intersection-0-1");
            assert_eq!(records[0].sources, (0, 1));
            assert!((records[0].area - 25.0).abs() < 1e-9);
            assert!(matches!(records[0].intersection, Geometry::Polygon { .. }));
        }
    }

    #[test]
    fn test_disjoint_polygons() {
        let polygons = [square(0.0, 0.0, 1.0), square(5.0, 5.0, 1.0), square(10.0, 0.0, 1.0)];
        assert!(planar(true).compute(&polygons).is_empty());
        assert!(planar(false).compute(&polygons).is_empty());
    }

    #[test]
    fn test_edge_touching_is_not_overlap() {
        let polygons = [square(0.0, 0.0, 1.0), square(1.0, 0.0, 1.0)];
        assert!(planar(true).compute(&polygons).is_empty());
    }

    #[test]
    fn test_invalid_polygon_is_excluded() {
        let bowtie = Geometry::polygon(vec![vec![
            [0.0, 0.0],
            [10.0, 10.0],
            [10.0, 0.0],
            [0.0, 10.0],
            [0.0, 0.0],
        ]]);
        let polygons = [bowtie, square(2.0, 2.0, 4.0), square(3.0, 3.0, 4.0)];

        let records = planar(false).compute(&polygons);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "intersection-1-2");
    }

    #[test]
    fn test_polygon_with_stray_hole_is_excluded() {
        let stray_hole = Geometry::polygon(vec![
            vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]],
            vec![[5.0, 5.0], [15.0, 5.0], [15.0, 8.0], [5.0, 8.0], [5.0, 5.0]],
        ]);
        let polygons = [stray_hole, square(2.0, 2.0, 4.0)];

        assert!(planar(true).compute(&polygons).is_empty());
        assert!(planar(false).compute(&polygons).is_empty());
    }

    #[test]
    fn test_index_and_exhaustive_agree() {
        let polygons = [
            square(0.0, 0.0, 4.0),
            square(2.0, 2.0, 4.0),
            square(3.0, 0.0, 4.0),
            square(50.0, 50.0, 4.0),
            square(1.0, 1.0, 1.0),
        ];
        let indexed = planar(true).compute(&polygons);
        let exhaustive = planar(false).compute(&polygons);

        let ids: Vec<&str> = indexed.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, exhaustive.iter().map(|r| r.id.as_str()).collect::<Vec<_>>());
        assert_eq!(
            ids,
            vec!["intersection-0-1", "intersection-0-2", "intersection-0-4", "intersection-1-2"]
        );
    }

    #[test]
    fn test_non_polygonal_inputs_skipped() {
        let polygons = [Geometry::point(1.0, 1.0), square(0.0, 0.0, 2.0), square(1.0, 1.0, 2.0)];
        let records = planar(true).compute(&polygons);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "intersection-1-2");
    }

    #[test]
    fn test_reverse_lookup_polygon_and_multipolygon() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(5.0, 5.0, 10.0);
        let b_rings = match &b {
            Geometry::Polygon { coordinates } => coordinates.clone(),
            _ => unreachable!(),
        };

        let features = vec![
            Feature::with_geometry("A", Geometry::collection(vec![Geometry::point(0.0, 0.0), a.clone()])),
            Feature::with_geometry("B", Geometry::multi_polygon(vec![b_rings])),
        ];

        let records = planar(true).compute(&[a, b]);
        let (first, second) = find_source_features(&records[0], &features);

        assert_eq!(first.map(|f| f.code.as_str()), Some("A"));
        assert_eq!(second.map(|f| f.code.as_str()), Some("B"));
    }

    #[test]
    fn test_reverse_lookup_miss() {
        let records = planar(true).compute(&[square(0.0, 0.0, 10.0), square(5.0, 5.0, 10.0)]);
        let features = vec![Feature::with_geometry("A", square(0.0, 0.0, 10.0))];

        let (first, second) = find_source_features(&records[0], &features);
        assert!(first.is_some());
        assert!(second.is_none());
    }

    #[test]
    fn test_collect_polygons() {
        let features = vec![
            Feature::with_geometry(
                "A",
                Geometry::collection(vec![square(0.0, 0.0, 1.0), square(3.0, 3.0, 1.0)]),
            ),
            Feature::with_geometry("B", Geometry::point(0.0, 0.0)),
            Feature::without_geometry("C"),
            Feature::with_geometry("D", square(9.0, 9.0, 1.0)),
        ];
        let polygons = collect_polygons(&features);
        assert_eq!(polygons, vec![square(0.0, 0.0, 1.0), square(3.0, 3.0, 1.0), square(9.0, 9.0, 1.0)]);
    }

    #[test]
    fn test_layer_toggle_does_not_recompute() {
        let mut layer = OverlapLayer::new(planar(true));
        let polygons = vec![square(0.0, 0.0, 10.0), square(5.0, 5.0, 10.0)];

        assert!(layer.update(polygons.clone()));
        assert_eq!(layer.computations(), 1);
        assert!(layer.visible_records().is_empty());

        layer.set_visible(true);
        assert_eq!(layer.visible_records().len(), 1);
        layer.set_visible(false);
        layer.set_visible(true);
        assert_eq!(layer.computations(), 1);

        assert!(!layer.update(polygons));
        assert_eq!(layer.computations(), 1);

        assert!(layer.update(vec![square(0.0, 0.0, 1.0)]));
        assert_eq!(layer.computations(), 2);
        assert!(layer.records().is_empty());
        assert!(layer.find("intersection-0-1").is_none());
    }

    #[test]
    fn test_layer_find() {
        let mut layer = OverlapLayer::new(planar(false));
        layer.update(vec![square(0.0, 0.0, 10.0), square(5.0, 5.0, 10.0)]);
        let record = layer.find("intersection-0-1").unwrap();
        assert_eq!(record.sources, (0, 1));
    }
}
