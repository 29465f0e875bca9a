pub mod feature;
pub mod geometry;
pub mod intersection;

pub use feature::Feature;
pub use geometry::{select_primary, Geometry, GeometryType, LatLng, Position};
pub use intersection::IntersectionRecord;
