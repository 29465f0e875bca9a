//! Parcel Geo - Geometry math, validity and overlap detection
//!
//! This crate converts the canonical geometries to `geo` types and hosts the
//! computations shared by the editor and the encroachment view: segment
//! projection, bounding envelopes, area, polygon validity and pairwise
//! overlap detection.

pub mod index;
pub mod models;
pub mod overlap;
pub mod spatial;
pub mod validation;

pub use overlap::{
    collect_polygons, find_source_feature, find_source_features, OverlapDetector, OverlapLayer,
};
pub use spatial::{bounding_box, measure_area, project_onto_segment, Bounds, SegmentProjection};
pub use validation::{is_valid_polygon, validate_polygonal, ValidationError, ValidationResult};
