//! Shared geometry math: bounding envelopes, segment projection and area

use geo::{Area, GeodesicArea, MultiPolygon};
use parcel_core::config::AreaMethod;
use serde::Serialize;

use crate::models::{Geometry, LatLng};

/// Latitude/longitude envelope
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub min_lng: f64,
    pub max_lat: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Envelope around a single position
    pub fn from_point(p: LatLng) -> Self {
        Self { min_lat: p.lat, min_lng: p.lng, max_lat: p.lat, max_lng: p.lng }
    }

    /// Grow the envelope to include `p`
    pub fn extend(&mut self, p: LatLng) {
        self.min_lat = self.min_lat.min(p.lat);
        self.min_lng = self.min_lng.min(p.lng);
        self.max_lat = self.max_lat.max(p.lat);
        self.max_lng = self.max_lng.max(p.lng);
    }

    pub fn center(&self) -> LatLng {
        LatLng::new((self.min_lat + self.max_lat) / 2.0, (self.min_lng + self.max_lng) / 2.0)
    }

    pub fn south_west(&self) -> LatLng {
        LatLng::new(self.min_lat, self.min_lng)
    }

    pub fn north_east(&self) -> LatLng {
        LatLng::new(self.max_lat, self.max_lng)
    }

    /// True when all four edges are finite and ordered
    pub fn is_valid(&self) -> bool {
        [self.min_lat, self.min_lng, self.max_lat, self.max_lng].iter().all(|v| v.is_finite())
            && self.min_lat <= self.max_lat
            && self.min_lng <= self.max_lng
    }
}

/// Envelope over every position of a geometry.
///
/// Returns None for geometries without positions or with non-finite ones.
pub fn bounding_box(geometry: &Geometry) -> Option<Bounds> {
    let mut bounds: Option<Bounds> = None;
    let mut finite = true;

    geometry.for_each_position(&mut |position| {
        let p = LatLng::from_position(position);
        if !p.lat.is_finite() || !p.lng.is_finite() {
            finite = false;
            return;
        }
        match bounds.as_mut() {
            Some(b) => b.extend(p),
            None => bounds = Some(Bounds::from_point(p)),
        }
    });

    bounds.filter(|b| finite && b.is_valid())
}

/// Closest point on a segment to a query point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentProjection {
    /// Closest point on the segment
    pub point: LatLng,
    /// Clamped scalar position along the segment, 0 at `start`, 1 at `end`
    pub t: f64,
    /// Distance from the query point to `point`, in degrees
    pub distance: f64,
}

/// Project `p` onto the segment `start..end`.
///
/// `t = clamp(dot(p - start, end - start) / |end - start|^2, 0, 1)`. A
/// degenerate segment projects onto `start`.
pub fn project_onto_segment(p: LatLng, start: LatLng, end: LatLng) -> SegmentProjection {
    let dlat = end.lat - start.lat;
    let dlng = end.lng - start.lng;
    let len_sq = dlat * dlat + dlng * dlng;

    if len_sq == 0.0 {
        return SegmentProjection { point: start, t: 0.0, distance: p.distance_to(start) };
    }

    let t = (((p.lat - start.lat) * dlat + (p.lng - start.lng) * dlng) / len_sq).clamp(0.0, 1.0);
    let point = LatLng::new(start.lat + t * dlat, start.lng + t * dlng);

    SegmentProjection { point, t, distance: p.distance_to(point) }
}

/// Area of a multipolygon.
///
/// `Planar` is the shoelace area in squared coordinate units. `Geodesic`
/// treats coordinates as WGS84 lon/lat and returns square metres.
pub fn measure_area(mp: &MultiPolygon, method: AreaMethod) -> f64 {
    match method {
        AreaMethod::Planar => mp.unsigned_area(),
        AreaMethod::Geodesic => mp.geodesic_area_unsigned(),
    }
}
