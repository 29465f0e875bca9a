//! View fitting for loaded figures

use parcel_core::config::EditorSettings;
use parcel_core::models::{Geometry, LatLng};
use parcel_geo::{bounding_box, Bounds};
use serde::Serialize;

/// How the map view should move to show a figure
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewRequest {
    FitBounds { bounds: Bounds, padding_px: u32, max_zoom: u8 },
    Center { center: LatLng, zoom: u8 },
}

/// View request for a geometry.
///
/// A bare Point centers at the fixed point zoom. Everything else fits the
/// envelope of all its positions. Returns None when there is nothing finite to
/// show.
pub fn fit_view(geometry: &Geometry, settings: &EditorSettings) -> Option<ViewRequest> {
    match geometry {
        Geometry::Point { coordinates } => {
            let center = LatLng::from_position(*coordinates);
            (center.lat.is_finite() && center.lng.is_finite())
                .then_some(ViewRequest::Center { center, zoom: settings.point_zoom })
        }
        other => bounding_box(other).map(|bounds| ViewRequest::FitBounds {
            bounds,
            padding_px: settings.fit_padding_px,
            max_zoom: settings.max_zoom,
        }),
    }
}
