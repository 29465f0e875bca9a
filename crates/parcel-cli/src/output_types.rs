use parcel_core::config::AreaMethod;
use parcel_core::models::Geometry;
use parcel_editor::{FigureKind, ViewRequest};
use serde::Serialize;
use std::collections::BTreeMap;

/// Output for inspect command
#[derive(Debug, Serialize)]
pub struct InspectOutput {
    pub kind: FigureKind,
    pub parts: usize,
    pub vertex_count: usize,
    pub handles: Vec<HandleInfo>,
    pub view: Option<ViewRequest>,
}

#[derive(Debug, Serialize)]
pub struct HandleInfo {
    pub part: usize,
    pub index: usize,
    pub lat: f64,
    pub lng: f64,
}

/// Output for edit command
#[derive(Debug, Serialize)]
pub struct EditOutput {
    pub operations: usize,
    /// Edited figure wrapped for storage; None when the figure was cleared
    pub geometry: Option<Geometry>,
}

/// Output for overlaps command
#[derive(Debug, Serialize)]
pub struct OverlapsOutput {
    pub feature_count: usize,
    pub polygon_count: usize,
    pub area_method: AreaMethod,
    pub spatial_index: bool,
    pub intersections: Vec<OverlapItem>,
}

#[derive(Debug, Serialize)]
pub struct OverlapItem {
    pub id: String,
    pub feature1: Option<String>,
    pub feature2: Option<String>,
    pub area: f64,
    pub intersection: Geometry,
}

/// Output for config command
#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    pub values: BTreeMap<String, ConfigEntry>,
}

#[derive(Debug, Serialize)]
pub struct ConfigEntry {
    pub value: String,
    pub source: String,
}
