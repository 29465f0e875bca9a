//! Error types for parcel

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParcelError {
    // Geometry errors
    #[error("Unsupported geometry type: {kind}")]
    UnsupportedGeometry { kind: String },

    #[error("Malformed geometry: {reason}")]
    MalformedGeometry { reason: String },

    #[error("Invalid geometry at feature {feature_id}: {reason}")]
    InvalidGeometry {
        feature_id: String,
        reason: String,
    },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, ParcelError>;
