//! Vertex handles: one draggable handle per editable vertex

use std::fmt;

use parcel_core::models::LatLng;
use serde::{Deserialize, Serialize};

use crate::figure::{Figure, FigureId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HandleId(pub u64);

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handle-{}", self.0)
    }
}

/// The ring or line a handle belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RingRef {
    pub figure: FigureId,
    pub part: usize,
}

/// One editable vertex of the active figure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VertexHandle {
    pub id: HandleId,
    pub position: LatLng,
    pub owner: RingRef,
    /// Position of the vertex within its ring, contiguous from 0
    pub index: usize,
    /// Position fixed at the end of the last drag or reposition
    pub anchor: LatLng,
}

/// Fresh handles for every vertex of one part, indexed from 0
pub(crate) fn build_part_handles(figure: &Figure, part: usize, next_id: &mut u64) -> Vec<VertexHandle> {
    let owner = RingRef { figure: figure.id(), part };
    let Some(vertices) = figure.part(part).map(|p| p.vertices()) else {
        return Vec::new();
    };

    vertices
        .iter()
        .enumerate()
        .map(|(index, &position)| {
            let id = HandleId(*next_id);
            *next_id += 1;
            VertexHandle { id, position, owner, index, anchor: position }
        })
        .collect()
}
