//! Storage boundary helpers
//!
//! The plot storage API only accepts GeometryCollections. Geometries coming out
//! of the editor are wrapped on the way out and unwrapped on the way in.

use crate::models::{select_primary, Geometry};

/// Wrap a geometry for the storage API.
///
/// A GeometryCollection is returned unchanged; anything else becomes a
/// single-member collection.
pub fn to_storage_format(geometry: Geometry) -> Geometry {
    match geometry {
        Geometry::GeometryCollection { .. } => geometry,
        other => Geometry::collection(vec![other]),
    }
}

/// Pick the editable geometry out of a stored value.
///
/// Collections are unwrapped by edit priority until a concrete geometry is
/// reached. Returns None for empty collections.
pub fn from_storage_format(geometry: &Geometry) -> Option<&Geometry> {
    match geometry {
        Geometry::GeometryCollection { geometries } => {
            select_primary(geometries).and_then(from_storage_format)
        }
        other => Some(other),
    }
}
