use crate::error::{ParcelError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// How overlap areas are measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AreaMethod {
    /// Shoelace area in squared coordinate units, no reprojection
    #[default]
    Planar,
    /// Spherical area in square metres, for lon/lat input
    Geodesic,
}

/// Settings consumed by the geometry editor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorSettings {
    /// Degrees; clicks closer than this to a handle hit the handle, not an edge
    pub hit_tolerance: f64,
    /// Pointer travel in pixels before a press on a handle becomes a drag
    pub drag_threshold_px: f64,
    /// Padding in pixels around a fitted bounding box
    pub fit_padding_px: u32,
    /// Zoom ceiling for bounding-box fits
    pub max_zoom: u8,
    /// Zoom used when centering on a single point
    pub point_zoom: u8,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            hit_tolerance: 1e-5,
            drag_threshold_px: 3.0,
            fit_padding_px: 20,
            max_zoom: 18,
            point_zoom: 15,
        }
    }
}

/// Settings consumed by the overlap detector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapSettings {
    pub area_method: AreaMethod,
    /// Prune candidate pairs with an R-tree before exact intersection
    pub spatial_index: bool,
}

impl Default for OverlapSettings {
    fn default() -> Self {
        Self { area_method: AreaMethod::Planar, spatial_index: true }
    }
}

/// Layered configuration for parcel
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub hit_tolerance: ConfigValue<f64>,
    pub drag_threshold_px: ConfigValue<f64>,
    pub fit_padding_px: ConfigValue<u32>,
    pub max_zoom: ConfigValue<u8>,
    pub point_zoom: ConfigValue<u8>,
    pub area_method: ConfigValue<AreaMethod>,
    pub spatial_index: ConfigValue<bool>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        let editor = EditorSettings::default();
        Self {
            hit_tolerance: ConfigValue::new(editor.hit_tolerance, ConfigSource::Default),
            drag_threshold_px: ConfigValue::new(editor.drag_threshold_px, ConfigSource::Default),
            fit_padding_px: ConfigValue::new(editor.fit_padding_px, ConfigSource::Default),
            max_zoom: ConfigValue::new(editor.max_zoom, ConfigSource::Default),
            point_zoom: ConfigValue::new(editor.point_zoom, ConfigSource::Default),
            area_method: ConfigValue::new(AreaMethod::Planar, ConfigSource::Default),
            spatial_index: ConfigValue::new(true, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ParcelError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| ParcelError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(tolerance) = file_config.hit_tolerance {
            self.hit_tolerance.update(parse_positive("hit_tolerance", tolerance)?, ConfigSource::File);
        }

        if let Some(threshold) = file_config.drag_threshold_px {
            self.drag_threshold_px
                .update(parse_positive("drag_threshold_px", threshold)?, ConfigSource::File);
        }

        if let Some(padding) = file_config.fit_padding_px {
            self.fit_padding_px.update(padding, ConfigSource::File);
        }

        if let Some(zoom) = file_config.max_zoom {
            self.max_zoom.update(zoom, ConfigSource::File);
        }

        if let Some(zoom) = file_config.point_zoom {
            self.point_zoom.update(zoom, ConfigSource::File);
        }

        if let Some(method) = file_config.area_method {
            self.area_method.update(method, ConfigSource::File);
        }

        if let Some(enabled) = file_config.spatial_index {
            self.spatial_index.update(enabled, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // PARCEL_HIT_TOLERANCE
        if let Ok(raw) = env::var("PARCEL_HIT_TOLERANCE") {
            match raw.parse::<f64>().ok().filter(|v| v.is_finite() && *v > 0.0) {
                Some(v) => self.hit_tolerance.update(v, ConfigSource::Environment),
                None => tracing::warn!(
                    "Invalid PARCEL_HIT_TOLERANCE value '{}': expected positive number of degrees",
                    raw
                ),
            }
        }

        // PARCEL_DRAG_THRESHOLD_PX
        if let Ok(raw) = env::var("PARCEL_DRAG_THRESHOLD_PX") {
            match raw.parse::<f64>().ok().filter(|v| v.is_finite() && *v > 0.0) {
                Some(v) => self.drag_threshold_px.update(v, ConfigSource::Environment),
                None => tracing::warn!(
                    "Invalid PARCEL_DRAG_THRESHOLD_PX value '{}': expected positive number of pixels",
                    raw
                ),
            }
        }

        // PARCEL_FIT_PADDING_PX
        if let Ok(raw) = env::var("PARCEL_FIT_PADDING_PX") {
            match raw.parse::<u32>() {
                Ok(v) => self.fit_padding_px.update(v, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid PARCEL_FIT_PADDING_PX value '{}': expected integer pixels",
                    raw
                ),
            }
        }

        // PARCEL_MAX_ZOOM
        if let Ok(raw) = env::var("PARCEL_MAX_ZOOM") {
            match raw.parse::<u8>() {
                Ok(v) => self.max_zoom.update(v, ConfigSource::Environment),
                Err(_) => {
                    tracing::warn!("Invalid PARCEL_MAX_ZOOM value '{}': expected zoom level", raw)
                }
            }
        }

        // PARCEL_POINT_ZOOM
        if let Ok(raw) = env::var("PARCEL_POINT_ZOOM") {
            match raw.parse::<u8>() {
                Ok(v) => self.point_zoom.update(v, ConfigSource::Environment),
                Err(_) => {
                    tracing::warn!("Invalid PARCEL_POINT_ZOOM value '{}': expected zoom level", raw)
                }
            }
        }

        // PARCEL_AREA_METHOD
        if let Ok(raw) = env::var("PARCEL_AREA_METHOD") {
            match parse_area_method(&raw) {
                Ok(v) => self.area_method.update(v, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid PARCEL_AREA_METHOD value '{}': expected planar or geodesic",
                    raw
                ),
            }
        }

        // PARCEL_SPATIAL_INDEX
        if let Ok(raw) = env::var("PARCEL_SPATIAL_INDEX") {
            match parse_bool(&raw) {
                Ok(v) => self.spatial_index.update(v, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid PARCEL_SPATIAL_INDEX value '{}': expected true or false",
                    raw
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(tolerance) = overrides.hit_tolerance {
            self.hit_tolerance.update(tolerance, ConfigSource::Cli);
        }

        if let Some(method) = overrides.area_method {
            self.area_method.update(method, ConfigSource::Cli);
        }

        if let Some(enabled) = overrides.spatial_index {
            self.spatial_index.update(enabled, ConfigSource::Cli);
        }
    }

    /// Settings for the geometry editor
    pub fn editor_settings(&self) -> EditorSettings {
        EditorSettings {
            hit_tolerance: self.hit_tolerance.value,
            drag_threshold_px: self.drag_threshold_px.value,
            fit_padding_px: self.fit_padding_px.value,
            max_zoom: self.max_zoom.value,
            point_zoom: self.point_zoom.value,
        }
    }

    /// Settings for the overlap detector
    pub fn overlap_settings(&self) -> OverlapSettings {
        OverlapSettings {
            area_method: self.area_method.value,
            spatial_index: self.spatial_index.value,
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "hit_tolerance".to_string(),
            (self.hit_tolerance.value.to_string(), self.hit_tolerance.source),
        );
        map.insert(
            "drag_threshold_px".to_string(),
            (self.drag_threshold_px.value.to_string(), self.drag_threshold_px.source),
        );
        map.insert(
            "fit_padding_px".to_string(),
            (self.fit_padding_px.value.to_string(), self.fit_padding_px.source),
        );
        map.insert(
            "max_zoom".to_string(),
            (self.max_zoom.value.to_string(), self.max_zoom.source),
        );
        map.insert(
            "point_zoom".to_string(),
            (self.point_zoom.value.to_string(), self.point_zoom.source),
        );
        map.insert(
            "area_method".to_string(),
            (format!("{:?}", self.area_method.value), self.area_method.source),
        );
        map.insert(
            "spatial_index".to_string(),
            (self.spatial_index.value.to_string(), self.spatial_index.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    hit_tolerance: Option<f64>,
    drag_threshold_px: Option<f64>,
    fit_padding_px: Option<u32>,
    max_zoom: Option<u8>,
    point_zoom: Option<u8>,
    area_method: Option<AreaMethod>,
    spatial_index: Option<bool>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub hit_tolerance: Option<f64>,
    pub area_method: Option<AreaMethod>,
    pub spatial_index: Option<bool>,
}

/// Parse area method from string
pub fn parse_area_method(s: &str) -> Result<AreaMethod> {
    match s.to_lowercase().as_str() {
        "planar" | "cartesian" => Ok(AreaMethod::Planar),
        "geodesic" | "spherical" => Ok(AreaMethod::Geodesic),
        _ => Err(ParcelError::ConfigInvalid {
            key: "area_method".to_string(),
            reason: format!("Invalid area method: {}. Use planar or geodesic", s),
        }),
    }
}

fn parse_bool(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ParcelError::ConfigInvalid {
            key: "spatial_index".to_string(),
            reason: format!("Invalid boolean: {}", s),
        }),
    }
}

fn parse_positive(key: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ParcelError::ConfigInvalid {
            key: key.to_string(),
            reason: format!("Expected a positive number, got {}", value),
        })
    }
}
