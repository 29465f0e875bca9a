//! Feature input parsing
//!
//! Plot lists arrive either as GeoJSON (FeatureCollection, Feature or a bare
//! geometry) or as a JSON array of plot records with a `geom` member. Both
//! end up as [`Feature`]s.

use std::fs;
use std::path::Path;

use crate::error::{ParcelError, Result};
use crate::models::{Feature, Geometry};

pub mod geojson;
pub mod records;

/// Parse a feature list from JSON text
pub fn parse_features(content: &str) -> Result<Vec<Feature>> {
    let value: serde_json::Value = serde_json::from_str(content)
        .map_err(|e| ParcelError::Serialization(format!("Failed to parse JSON: {}", e)))?;

    if value.is_array() {
        records::features_from_records(&value)
    } else {
        geojson::features_from_geojson(content)
    }
}

/// Read and parse a feature list from a file
pub fn read_features(path: &Path) -> Result<Vec<Feature>> {
    let content = fs::read_to_string(path)?;
    parse_features(&content)
}

/// Read a single geometry from a file.
///
/// Accepts a bare geometry or a Feature wrapping one.
pub fn read_geometry(path: &Path) -> Result<Geometry> {
    let content = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .map_err(|e| ParcelError::Serialization(format!("Failed to parse JSON: {}", e)))?;

    match value.get("type").and_then(|t| t.as_str()) {
        Some("Feature") => {
            let geometry = value.get("geometry").filter(|g| !g.is_null()).ok_or_else(|| {
                ParcelError::MalformedGeometry { reason: "Feature has no geometry".to_string() }
            })?;
            Geometry::from_geojson(geometry)
        }
        _ => Geometry::from_geojson(&value),
    }
}

/// Parse a feature geometry, downgrading unsupported types to None.
///
/// Malformed geometries are still errors.
fn parse_feature_geometry(code: &str, value: Option<&serde_json::Value>) -> Result<Option<Geometry>> {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return Ok(None);
    };

    match Geometry::from_geojson(value) {
        Ok(geometry) => Ok(Some(geometry)),
        Err(ParcelError::UnsupportedGeometry { kind }) => {
            tracing::warn!(feature = %code, kind = %kind, "Ignoring unsupported feature geometry");
            Ok(None)
        }
        Err(ParcelError::MalformedGeometry { reason }) => Err(ParcelError::InvalidGeometry {
            feature_id: code.to_string(),
            reason,
        }),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_features_dispatch() {
        let records = r#"[{"code": "A", "geom": {"type": "Point", "coordinates": [1.0, 2.0]}}]"#;
        let features = parse_features(records).unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].code, "A");

        let collection = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "id": "B", "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}, "properties": {}}
        ]}"#;
        let features = parse_features(collection).unwrap();
        assert_eq!(features[0].code, "B");
    }

    #[test]
    fn test_parse_features_invalid_json() {
        assert!(matches!(parse_features("not json"), Err(ParcelError::Serialization(_))));
    }

    #[test]
    fn test_read_geometry_from_feature() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"type": "Feature", "geometry": {{"type": "Point", "coordinates": [3.0, 4.0]}}, "properties": null}}"#
        )
        .unwrap();

        let geometry = read_geometry(file.path()).unwrap();
        assert_eq!(geometry, Geometry::point(3.0, 4.0));
    }

    #[test]
    fn test_read_geometry_unsupported() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"type": "MultiPoint", "coordinates": [[3.0, 4.0]]}}"#).unwrap();

        assert!(matches!(
            read_geometry(file.path()),
            Err(ParcelError::UnsupportedGeometry { .. })
        ));
    }
}
