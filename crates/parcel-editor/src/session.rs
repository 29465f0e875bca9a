//! The editor session: active figure, vertex handles, selection and drag state

use parcel_core::config::EditorSettings;
use parcel_core::models::{Geometry, LatLng};
use parcel_core::storage::from_storage_format;
use parcel_core::ParcelError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::drag::{DragOutcome, DragSession, ScreenPoint};
use crate::error::{EditorError, Result};
use crate::figure::{Figure, FigureId, FigureKind};
use crate::handle::{build_part_handles, HandleId, VertexHandle};
use crate::input::{ensure_finite, parse_lat_lng};
use crate::view::{fit_view, ViewRequest};

/// Shape kinds the draw tool produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawKind {
    Line,
    Polygon,
}

impl DrawKind {
    fn figure_kind(self) -> FigureKind {
        match self {
            DrawKind::Line => FigureKind::LineString,
            DrawKind::Polygon => FigureKind::Polygon,
        }
    }
}

/// A completed line or polygon from the draw tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawnShape {
    pub kind: DrawKind,
    pub vertices: Vec<LatLng>,
}

/// Result of a vertex insertion
#[derive(Debug, Clone, PartialEq)]
pub struct Insertion {
    /// The new handle, already selected
    pub handle: HandleId,
    pub position: LatLng,
    pub geometry: Geometry,
}

/// Result of deleting the selected vertex
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    Deleted(Geometry),
    /// The ring is at its minimum; only deleting the whole figure can proceed
    FigureDeletionRequired,
}

/// Editing state for one map.
///
/// Holds at most one figure and at most one selected handle. Handles are
/// kept ordered by part and index, and their indices within a part are always
/// `0..n`.
#[derive(Debug, Clone)]
pub struct EditorSession {
    settings: EditorSettings,
    figure: Option<Figure>,
    handles: Vec<VertexHandle>,
    selected: Option<HandleId>,
    drag: Option<DragSession>,
    map_interaction_enabled: bool,
    next_figure_id: u64,
    next_handle_id: u64,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorSettings::default())
    }
}

impl EditorSession {
    pub fn new(settings: EditorSettings) -> Self {
        Self {
            settings,
            figure: None,
            handles: Vec::new(),
            selected: None,
            drag: None,
            map_interaction_enabled: true,
            next_figure_id: 1,
            next_handle_id: 1,
        }
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn figure(&self) -> Option<&Figure> {
        self.figure.as_ref()
    }

    pub fn handles(&self) -> &[VertexHandle] {
        &self.handles
    }

    pub fn handle(&self, id: HandleId) -> Option<&VertexHandle> {
        self.handles.iter().find(|h| h.id == id)
    }

    /// Handle for vertex `index` of `part`
    pub fn handle_at(&self, part: usize, index: usize) -> Option<&VertexHandle> {
        self.handles.iter().find(|h| h.owner.part == part && h.index == index)
    }

    pub fn selected(&self) -> Option<&VertexHandle> {
        self.selected.and_then(|id| self.handle(id))
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// False while a drag owns the pointer
    pub fn is_map_interaction_enabled(&self) -> bool {
        self.map_interaction_enabled
    }

    /// The active figure as GeoJSON
    pub fn current_geometry(&self) -> Option<Geometry> {
        self.figure.as_ref().map(Figure::to_geometry)
    }

    /// View request that frames the active figure
    pub fn view(&self) -> Option<ViewRequest> {
        self.current_geometry().and_then(|g| fit_view(&g, &self.settings))
    }

    /// Load a geometry as the active figure.
    ///
    /// `None` clears the editor. Geometries the editor cannot hold are logged
    /// and ignored, keeping the previous figure.
    pub fn load(&mut self, geometry: Option<&Geometry>) -> Option<ViewRequest> {
        let Some(geometry) = geometry else {
            self.delete_figure();
            return None;
        };

        match self.try_load(geometry) {
            Ok(view) => view,
            Err(e) => {
                warn!(error = %e, kind = %geometry.geometry_type(), "Ignoring geometry the editor cannot load");
                None
            }
        }
    }

    /// Like [`EditorSession::load`], but reports why a geometry was refused
    pub fn try_load(&mut self, geometry: &Geometry) -> Result<Option<ViewRequest>> {
        let editable = from_storage_format(geometry).ok_or_else(|| ParcelError::MalformedGeometry {
            reason: "GeometryCollection has no members".to_string(),
        })?;

        let figure = Figure::from_geometry(FigureId(self.next_figure_id), editable)?;
        self.next_figure_id += 1;

        debug!(figure = %figure.id(), kind = %figure.kind(), vertices = figure.vertex_count(), "Loaded figure");
        self.install(figure);

        Ok(fit_view(editable, &self.settings))
    }

    /// Replace the active figure with a drawn line or polygon.
    ///
    /// A polygon whose last vertex repeats the first is treated as already
    /// closed.
    pub fn draw(&mut self, shape: DrawnShape) -> Result<Geometry> {
        self.ensure_idle()?;

        let kind = shape.kind.figure_kind();
        let mut vertices = shape.vertices;
        for vertex in &vertices {
            ensure_finite(*vertex)?;
        }
        if kind.is_polygonal() && vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }
        if vertices.len() < kind.min_vertices() {
            return Err(EditorError::DrawTooShort {
                kind: kind.to_string(),
                minimum: kind.min_vertices(),
                found: vertices.len(),
            });
        }

        let figure = Figure::from_vertices(FigureId(self.next_figure_id), kind, vertices);
        self.next_figure_id += 1;

        debug!(figure = %figure.id(), kind = %kind, vertices = figure.vertex_count(), "Drew figure");
        self.install(figure);
        self.geometry()
    }

    /// Make `id` the only selected handle and return its position
    pub fn select(&mut self, id: HandleId) -> Result<LatLng> {
        let position = self.handle(id).ok_or(EditorError::HandleNotFound(id))?.position;
        self.selected = Some(id);
        Ok(position)
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Press on a handle. Map interaction stays disabled until [`end_drag`].
    ///
    /// [`end_drag`]: EditorSession::end_drag
    pub fn begin_drag(&mut self, id: HandleId, screen: ScreenPoint) -> Result<()> {
        if self.drag.is_some() {
            return Err(EditorError::DragInProgress);
        }
        if self.handle(id).is_none() {
            return Err(EditorError::HandleNotFound(id));
        }

        self.drag = Some(DragSession::new(id, screen));
        self.map_interaction_enabled = false;
        Ok(())
    }

    /// Pointer moved during a drag.
    ///
    /// Returns the updated geometry once travel has passed the drag
    /// threshold, and None while the gesture may still be a click.
    pub fn drag_to(&mut self, screen: ScreenPoint, position: LatLng) -> Result<Option<Geometry>> {
        let threshold = self.settings.drag_threshold_px;
        let drag = self.drag.as_mut().ok_or(EditorError::NoDragInProgress)?;
        if !drag.track(screen, threshold) {
            return Ok(None);
        }

        let id = drag.handle();
        self.place_handle(id, ensure_finite(position)?)?;
        self.geometry().map(Some)
    }

    /// Release the pointer.
    ///
    /// The last reported position becomes final. A press that never passed
    /// the threshold counts as a click and selects the handle.
    pub fn end_drag(&mut self) -> Result<DragOutcome> {
        let drag = self.drag.take().ok_or(EditorError::NoDragInProgress)?;
        self.map_interaction_enabled = true;

        let id = drag.handle();
        let handle = self
            .handles
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or(EditorError::HandleNotFound(id))?;

        if drag.is_drag() {
            handle.anchor = handle.position;
            let position = handle.position;
            debug!(handle = %id, lat = position.lat, lng = position.lng, "Finished drag");
            Ok(DragOutcome::Moved { position, geometry: self.geometry()? })
        } else {
            let position = handle.position;
            self.selected = Some(id);
            Ok(DragOutcome::Clicked(position))
        }
    }

    /// Insert a vertex on the edge closest to `click`.
    ///
    /// Returns None when the click lands on an existing handle or the figure
    /// has no edges. The new vertex goes right after the edge's start vertex
    /// and its handle becomes the selection.
    pub fn insert_at(&mut self, click: LatLng) -> Result<Option<Insertion>> {
        self.ensure_idle()?;
        let click = ensure_finite(click)?;
        let figure = self.figure.as_ref().ok_or(EditorError::NoActiveFigure)?;

        if let Some(hit) = self.hit_handle(click) {
            debug!(handle = %hit, "Click hit a handle, not inserting");
            return Ok(None);
        }

        let Some(edge) = figure.closest_edge(click) else {
            return Ok(None);
        };

        let index = edge.start + 1;
        let position = edge.projection.point;
        if let Some(figure) = self.figure.as_mut() {
            figure.insert_vertex(edge.part, index, position);
        }
        self.rebuild_part(edge.part);

        let handle = self
            .handle_at(edge.part, index)
            .map(|h| h.id)
            .ok_or(EditorError::NoActiveFigure)?;
        self.selected = Some(handle);

        debug!(part = edge.part, index, lat = position.lat, lng = position.lng, "Inserted vertex");
        Ok(Some(Insertion { handle, position, geometry: self.geometry()? }))
    }

    /// Delete the selected vertex.
    ///
    /// Refused, with the figure untouched, when the ring would drop below its
    /// minimum vertex count.
    pub fn delete_selected(&mut self) -> Result<DeleteOutcome> {
        self.ensure_idle()?;
        let id = self.selected.ok_or(EditorError::NoSelection)?;
        let handle = self.handle(id).cloned().ok_or(EditorError::HandleNotFound(id))?;
        let figure = self.figure.as_mut().ok_or(EditorError::NoActiveFigure)?;

        let remaining = figure.part(handle.owner.part).map(|p| p.len()).unwrap_or(0);
        if remaining <= figure.kind().min_vertices() {
            info!(
                figure = %figure.id(),
                vertices = remaining,
                minimum = figure.kind().min_vertices(),
                "Vertex deletion refused, figure deletion required"
            );
            return Ok(DeleteOutcome::FigureDeletionRequired);
        }

        figure.remove_vertex(handle.owner.part, handle.index);
        self.selected = None;
        self.rebuild_part(handle.owner.part);

        debug!(part = handle.owner.part, index = handle.index, "Deleted vertex");
        Ok(DeleteOutcome::Deleted(self.geometry()?))
    }

    /// Remove the active figure and all of its handles.
    ///
    /// Returns the geometry that was removed, if any.
    pub fn delete_figure(&mut self) -> Option<Geometry> {
        let removed = self.figure.take().map(|f| f.to_geometry());
        self.handles.clear();
        self.selected = None;
        self.drag = None;
        self.map_interaction_enabled = true;

        if removed.is_some() {
            debug!("Deleted figure");
        }
        removed
    }

    /// Clear-all action
    pub fn clear(&mut self) {
        self.delete_figure();
    }

    /// Move a handle and fix the new position as its anchor
    pub fn move_handle(&mut self, id: HandleId, position: LatLng) -> Result<Geometry> {
        self.ensure_idle()?;
        let position = ensure_finite(position)?;
        self.place_handle(id, position)?;
        if let Some(handle) = self.handles.iter_mut().find(|h| h.id == id) {
            handle.anchor = position;
        }
        self.geometry()
    }

    /// Reposition the selected handle from the manual input fields
    pub fn set_selected_position(&mut self, lat_text: &str, lng_text: &str) -> Result<Geometry> {
        let id = self.selected.ok_or(EditorError::NoSelection)?;
        let position = parse_lat_lng(lat_text, lng_text)?;
        self.move_handle(id, position)
    }

    fn geometry(&self) -> Result<Geometry> {
        self.current_geometry().ok_or(EditorError::NoActiveFigure)
    }

    fn ensure_idle(&self) -> Result<()> {
        match self.drag {
            Some(_) => Err(EditorError::DragInProgress),
            None => Ok(()),
        }
    }

    /// Closest handle within the hit tolerance
    fn hit_handle(&self, p: LatLng) -> Option<HandleId> {
        self.handles
            .iter()
            .map(|h| (h.id, h.position.distance_to(p)))
            .filter(|(_, d)| *d < self.settings.hit_tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    fn place_handle(&mut self, id: HandleId, position: LatLng) -> Result<()> {
        let handle = self
            .handles
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or(EditorError::HandleNotFound(id))?;
        let figure = self.figure.as_mut().ok_or(EditorError::NoActiveFigure)?;

        if !figure.set_vertex(handle.owner.part, handle.index, position) {
            return Err(EditorError::HandleNotFound(id));
        }
        handle.position = position;
        Ok(())
    }

    fn install(&mut self, figure: Figure) {
        self.figure = Some(figure);
        self.selected = None;
        self.drag = None;
        self.map_interaction_enabled = true;
        self.handles.clear();

        let parts = self.figure.as_ref().map(|f| f.parts().len()).unwrap_or(0);
        for part in 0..parts {
            self.rebuild_part(part);
        }
    }

    /// Replace every handle of one part with freshly indexed ones
    fn rebuild_part(&mut self, part: usize) {
        let Some(figure) = self.figure.as_ref() else {
            return;
        };

        self.handles.retain(|h| h.owner.part != part);
        let fresh = build_part_handles(figure, part, &mut self.next_handle_id);
        self.handles.extend(fresh);
        self.handles.sort_by_key(|h| (h.owner.part, h.index));
    }
}
