//! Pointer drag tracking for vertex handles

use parcel_core::models::{Geometry, LatLng};
use serde::{Deserialize, Serialize};

use crate::handle::HandleId;

/// Pointer position in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: ScreenPoint) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// State of the single in-flight drag
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    handle: HandleId,
    start: ScreenPoint,
    current: ScreenPoint,
    moved: bool,
}

impl DragSession {
    pub fn new(handle: HandleId, start: ScreenPoint) -> Self {
        Self { handle, start, current: start, moved: false }
    }

    pub fn handle(&self) -> HandleId {
        self.handle
    }

    pub fn start(&self) -> ScreenPoint {
        self.start
    }

    pub fn current(&self) -> ScreenPoint {
        self.current
    }

    /// Record a pointer move. Returns true once travel from the press point
    /// has exceeded `threshold_px`; it stays true for the rest of the session.
    pub fn track(&mut self, screen: ScreenPoint, threshold_px: f64) -> bool {
        self.current = screen;
        if !self.moved && self.start.distance_to(screen) > threshold_px {
            self.moved = true;
        }
        self.moved
    }

    /// False while the gesture is still a click
    pub fn is_drag(&self) -> bool {
        self.moved
    }
}

/// How a pointer release resolved
#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    /// The handle was dragged; `position` is now its anchor
    Moved { position: LatLng, geometry: Geometry },
    /// Travel stayed under the threshold; the handle was selected instead
    Clicked(LatLng),
}
