//! Error types for the geometry editor

use parcel_core::ParcelError;
use thiserror::Error;

use crate::handle::HandleId;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("No active figure")]
    NoActiveFigure,

    #[error("Vertex handle not found: {0}")]
    HandleNotFound(HandleId),

    #[error("No vertex handle is selected")]
    NoSelection,

    #[error("A drag is already in progress")]
    DragInProgress,

    #[error("No drag in progress")]
    NoDragInProgress,

    #[error("Invalid {field} value '{value}': {reason}")]
    InvalidCoordinate {
        field: String,
        value: String,
        reason: String,
    },

    #[error("A drawn {kind} needs at least {minimum} vertices, found {found}")]
    DrawTooShort {
        kind: String,
        minimum: usize,
        found: usize,
    },

    #[error(transparent)]
    Core(#[from] ParcelError),
}

pub type Result<T> = std::result::Result<T, EditorError>;
