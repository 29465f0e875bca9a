//! Parcel Core - Geometry model, configuration and input parsing
//!
//! This crate holds the data types shared by the editor and the overlap
//! detector: the GeoJSON geometry sum type, plot features, intersection
//! records, the storage boundary and layered configuration.

pub mod config;
pub mod error;
pub mod formats;
pub mod models;
pub mod storage;

pub use error::{ParcelError, Result};
