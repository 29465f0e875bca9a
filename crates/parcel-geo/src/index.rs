use geo::algorithm::bounding_rect::BoundingRect;
use geo::MultiPolygon;
use rstar::{RTree, RTreeObject, AABB};

/// Polygon envelope keyed by its position in the input list
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedEnvelope {
    /// Position of the polygon in the detector input
    pub idx: usize,

    envelope: AABB<[f64; 2]>,
}

impl IndexedEnvelope {
    /// Envelope for a polygon; None when the polygon has no extent
    pub fn new(idx: usize, polygon: &MultiPolygon) -> Option<Self> {
        let rect = polygon.bounding_rect()?;
        let min = rect.min();
        let max = rect.max();
        Some(Self { idx, envelope: AABB::from_corners([min.x, min.y], [max.x, max.y]) })
    }
}

impl RTreeObject for IndexedEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// R-tree over polygon envelopes, used to prune overlap candidates
pub struct PolygonIndex {
    tree: RTree<IndexedEnvelope>,
}

impl PolygonIndex {
    /// Build an index from `(position, polygon)` pairs
    pub fn from_polygons<'a>(polygons: impl IntoIterator<Item = (usize, &'a MultiPolygon)>) -> Self {
        let indexed: Vec<IndexedEnvelope> = polygons
            .into_iter()
            .filter_map(|(idx, polygon)| IndexedEnvelope::new(idx, polygon))
            .collect();

        Self { tree: RTree::bulk_load(indexed) }
    }

    /// Every pair `(i, j)`, `i < j`, whose envelopes touch or overlap, in ascending order
    pub fn candidate_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for item in self.tree.iter() {
            for other in self.tree.locate_in_envelope_intersecting(&item.envelope) {
                if other.idx > item.idx {
                    pairs.push((item.idx, other.idx));
                }
            }
        }

        pairs.sort_unstable();
        pairs.dedup();
        pairs
    }

    /// Get the total number of polygons in the index
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
