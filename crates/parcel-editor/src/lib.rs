//! Interactive geometry editor for parcel figures.
//!
//! [`EditorSession`] owns the active figure and its vertex handles. Every
//! operation is a synchronous method on the session, so the editor can be
//! driven and tested without a map library. [`EditorController`] is the thin
//! layer that turns pointer events from a [`MapSurface`] into session calls.

pub mod adapter;
pub mod drag;
pub mod error;
pub mod figure;
pub mod handle;
pub mod input;
pub mod session;
pub mod view;

pub use adapter::{EditorController, MapSurface, PointerEvent};
pub use drag::{DragOutcome, ScreenPoint};
pub use error::{EditorError, Result};
pub use figure::{Figure, FigureId, FigureKind, Part};
pub use handle::{HandleId, RingRef, VertexHandle};
pub use input::parse_lat_lng;
pub use session::{DeleteOutcome, DrawKind, DrawnShape, EditorSession, Insertion};
pub use view::{fit_view, ViewRequest};
