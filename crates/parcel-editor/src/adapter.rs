//! Adapter between a map surface and the editor session.
//!
//! The map library reports pointer events; [`EditorController`] turns them
//! into session calls and reports the results back through [`MapSurface`].

use parcel_core::models::{Geometry, LatLng};

use crate::drag::{DragOutcome, ScreenPoint};
use crate::error::Result;
use crate::handle::HandleId;
use crate::session::{DeleteOutcome, DrawnShape, EditorSession};
use crate::view::ViewRequest;

/// Port for the map widget hosting the editor
pub trait MapSurface {
    /// Enable or disable panning and zooming of the whole map
    fn set_interaction_enabled(&mut self, enabled: bool);

    /// Move the view to frame a figure
    fn apply_view(&mut self, view: &ViewRequest);

    /// The active figure changed; None when it was removed
    fn figure_changed(&mut self, geometry: Option<&Geometry>);

    /// Publish a selected vertex to the coordinate input fields
    fn coordinates_selected(&mut self, position: LatLng);

    /// Ask the user whether the whole figure should be deleted
    fn confirm_figure_deletion(&mut self) -> bool;
}

/// Pointer and toolbar events from the map
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    HandleDown { handle: HandleId, screen: ScreenPoint },
    PointerMove { screen: ScreenPoint, position: LatLng },
    PointerUp,
    /// Click on a rendered edge of the figure
    FigureClick { position: LatLng },
    DrawComplete(DrawnShape),
    DeleteRequested,
    ClearRequested,
}

pub struct EditorController<S: MapSurface> {
    session: EditorSession,
    surface: S,
}

impl<S: MapSurface> EditorController<S> {
    pub fn new(session: EditorSession, surface: S) -> Self {
        Self { session, surface }
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_parts(self) -> (EditorSession, S) {
        (self.session, self.surface)
    }

    /// Load a geometry and frame it
    pub fn load(&mut self, geometry: Option<&Geometry>) {
        let was_dragging = self.session.is_dragging();
        let view = self.session.load(geometry);

        if was_dragging && !self.session.is_dragging() {
            self.surface.set_interaction_enabled(true);
        }
        if let Some(view) = view {
            self.surface.apply_view(&view);
        }
        self.surface.figure_changed(self.session.current_geometry().as_ref());
    }

    /// Dispatch one event. Pointer moves and releases outside a drag are ignored.
    pub fn handle(&mut self, event: PointerEvent) -> Result<()> {
        match event {
            PointerEvent::HandleDown { handle, screen } => {
                self.session.begin_drag(handle, screen)?;
                self.surface.set_interaction_enabled(false);
            }
            PointerEvent::PointerMove { screen, position } => {
                if !self.session.is_dragging() {
                    return Ok(());
                }
                if let Some(geometry) = self.session.drag_to(screen, position)? {
                    self.surface.figure_changed(Some(&geometry));
                }
            }
            PointerEvent::PointerUp => {
                if !self.session.is_dragging() {
                    return Ok(());
                }
                let outcome = self.session.end_drag();
                self.surface.set_interaction_enabled(true);
                if let DragOutcome::Clicked(position) = outcome? {
                    self.surface.coordinates_selected(position);
                }
            }
            PointerEvent::FigureClick { position } => {
                if let Some(insertion) = self.session.insert_at(position)? {
                    self.surface.figure_changed(Some(&insertion.geometry));
                    self.surface.coordinates_selected(insertion.position);
                }
            }
            PointerEvent::DrawComplete(shape) => {
                let geometry = self.session.draw(shape)?;
                self.surface.figure_changed(Some(&geometry));
            }
            PointerEvent::DeleteRequested => match self.session.delete_selected()? {
                DeleteOutcome::Deleted(geometry) => self.surface.figure_changed(Some(&geometry)),
                DeleteOutcome::FigureDeletionRequired => {
                    if self.surface.confirm_figure_deletion() {
                        self.session.delete_figure();
                        self.surface.figure_changed(None);
                    }
                }
            },
            PointerEvent::ClearRequested => {
                let was_dragging = self.session.is_dragging();
                self.session.clear();
                if was_dragging {
                    self.surface.set_interaction_enabled(true);
                }
                self.surface.figure_changed(None);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct RecordingSurface {
        interaction: Vec<bool>,
        views: Vec<ViewRequest>,
        figures: Vec<Option<Geometry>>,
        selections: Vec<LatLng>,
        confirm: bool,
        confirmations: usize,
    }

    impl MapSurface for RecordingSurface {
        fn set_interaction_enabled(&mut self, enabled: bool) {
            self.interaction.push(enabled);
        }

        fn apply_view(&mut self, view: &ViewRequest) {
            self.views.push(*view);
        }

        fn figure_changed(&mut self, geometry: Option<&Geometry>) {
            self.figures.push(geometry.cloned());
        }

        fn coordinates_selected(&mut self, position: LatLng) {
            self.selections.push(position);
        }

        fn confirm_figure_deletion(&mut self) -> bool {
            self.confirmations += 1;
            self.confirm
        }
    }

    fn triangle() -> Geometry {
        Geometry::polygon(vec![vec![[0.0, 0.0], [2.0, 0.0], [0.0, 2.0], [0.0, 0.0]]])
    }

    fn controller(confirm: bool) -> EditorController<RecordingSurface> {
        let surface = RecordingSurface { confirm, ..RecordingSurface::default() };
        let mut controller = EditorController::new(EditorSession::default(), surface);
        controller.load(Some(&triangle()));
        controller
    }

    #[test]
    fn test_load_applies_view() {
        let controller = controller(false);
        assert_eq!(controller.surface().views.len(), 1);
        assert_eq!(controller.surface().figures, vec![Some(triangle())]);
    }

    #[test]
    fn test_drag_toggles_map_interaction() {
        let mut controller = controller(false);
        let handle = controller.session().handles()[0].id;

        controller.handle(PointerEvent::HandleDown { handle, screen: ScreenPoint::new(0.0, 0.0) }).unwrap();
        controller
            .handle(PointerEvent::PointerMove {
                screen: ScreenPoint::new(50.0, 0.0),
                position: LatLng::new(-1.0, -1.0),
            })
            .unwrap();
        controller.handle(PointerEvent::PointerUp).unwrap();

        let surface = controller.surface();
        assert_eq!(surface.interaction, vec![false, true]);
        assert_eq!(surface.figures.len(), 2);
        assert!(surface.selections.is_empty());
    }

    #[test]
    fn test_click_on_handle_selects() {
        let mut controller = controller(false);
        let handle = controller.session().handles()[1].id;

        controller.handle(PointerEvent::HandleDown { handle, screen: ScreenPoint::new(5.0, 5.0) }).unwrap();
        controller.handle(PointerEvent::PointerUp).unwrap();

        assert_eq!(controller.surface().selections, vec![LatLng::new(0.0, 2.0)]);
        assert_eq!(controller.session().selected().map(|h| h.id), Some(handle));
    }

    #[test]
    fn test_stray_pointer_events_are_ignored() {
        let mut controller = controller(false);
        controller
            .handle(PointerEvent::PointerMove { screen: ScreenPoint::default(), position: LatLng::new(0.0, 0.0) })
            .unwrap();
        controller.handle(PointerEvent::PointerUp).unwrap();
        assert!(controller.surface().interaction.is_empty());
    }

    #[test]
    fn test_figure_click_inserts_and_publishes() {
        let mut controller = controller(false);
        controller.handle(PointerEvent::FigureClick { position: LatLng::new(0.0, 1.0) }).unwrap();

        assert_eq!(controller.session().handles().len(), 4);
        assert_eq!(controller.surface().selections, vec![LatLng::new(0.0, 1.0)]);
    }

    #[test]
    fn test_refused_deletion_asks_for_confirmation() {
        let mut declined = controller(false);
        let handle = declined.session().handles()[0].id;
        declined.handle(PointerEvent::HandleDown { handle, screen: ScreenPoint::default() }).unwrap();
        declined.handle(PointerEvent::PointerUp).unwrap();
        declined.handle(PointerEvent::DeleteRequested).unwrap();

        assert_eq!(declined.surface().confirmations, 1);
        assert_eq!(declined.session().current_geometry(), Some(triangle()));

        let mut accepted = controller(true);
        let handle = accepted.session().handles()[0].id;
        accepted.handle(PointerEvent::HandleDown { handle, screen: ScreenPoint::default() }).unwrap();
        accepted.handle(PointerEvent::PointerUp).unwrap();
        accepted.handle(PointerEvent::DeleteRequested).unwrap();

        assert!(accepted.session().figure().is_none());
        assert_eq!(accepted.surface().figures.last(), Some(&None));
    }

    #[test]
    fn test_clear_requested() {
        let mut controller = controller(false);
        controller.handle(PointerEvent::ClearRequested).unwrap();
        assert!(controller.session().figure().is_none());
        assert_eq!(controller.surface().figures.last(), Some(&None));
    }
}
