//! GeoJSON feature input

use crate::error::{ParcelError, Result};
use crate::models::Feature;

use super::parse_feature_geometry;

/// Parse GeoJSON text into features.
///
/// A FeatureCollection yields one feature per member, a single Feature yields
/// one, and a bare geometry is wrapped as feature `"0"`.
pub fn features_from_geojson(content: &str) -> Result<Vec<Feature>> {
    let geojson: geojson::GeoJson = content.parse().map_err(|e| {
        ParcelError::Serialization(format!("Failed to parse GeoJSON: {}", e))
    })?;

    match geojson {
        geojson::GeoJson::FeatureCollection(fc) => fc
            .features
            .iter()
            .enumerate()
            .map(|(idx, feature)| convert_feature(feature, idx))
            .collect(),
        geojson::GeoJson::Feature(feature) => Ok(vec![convert_feature(&feature, 0)?]),
        geojson::GeoJson::Geometry(geom) => {
            let value = serde_json::to_value(&geom).map_err(|e| {
                ParcelError::Serialization(format!("Failed to serialize geometry: {}", e))
            })?;
            let geometry = parse_feature_geometry("0", Some(&value))?;
            Ok(vec![Feature { code: "0".to_string(), geom: geometry, attributes: Default::default() }])
        }
    }
}

/// Convert a GeoJSON feature, using its index as code when it has no id
fn convert_feature(feature: &geojson::Feature, idx: usize) -> Result<Feature> {
    let code = feature
        .id
        .as_ref()
        .map(|id| match id {
            geojson::feature::Id::String(s) => s.clone(),
            geojson::feature::Id::Number(n) => n.to_string(),
        })
        .unwrap_or_else(|| idx.to_string());

    let geometry_json = feature
        .geometry
        .as_ref()
        .map(serde_json::to_value)
        .transpose()
        .map_err(|e| ParcelError::Serialization(format!("Failed to serialize geometry: {}", e)))?;

    let geom = parse_feature_geometry(&code, geometry_json.as_ref())?;

    let attributes = feature.properties.clone().unwrap_or_default();

    Ok(Feature { code, geom, attributes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Geometry;

    #[test]
    fn test_feature_collection() {
        let content = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "id": "plot-1",
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
                    },
                    "properties": {"region": "North"}
                },
                {
                    "type": "Feature",
                    "geometry": {"type": "Point", "coordinates": [5.0, 5.0]},
                    "properties": null
                }
            ]
        }"#;

        let features = features_from_geojson(content).unwrap();

        assert_eq!(features.len(), 2);
        assert_eq!(features[0].code, "plot-1");
        assert_eq!(features[0].attributes["region"], "North");
        assert!(matches!(features[0].geom, Some(Geometry::Polygon { .. })));
        assert_eq!(features[1].code, "1");
        assert_eq!(features[1].geom, Some(Geometry::point(5.0, 5.0)));
    }

    #[test]
    fn test_numeric_id() {
        let content = r#"{"type": "Feature", "id": 42, "geometry": null, "properties": {}}"#;
        let features = features_from_geojson(content).unwrap();
        assert_eq!(features[0].code, "42");
        assert!(features[0].geom.is_none());
    }

    #[test]
    fn test_unsupported_geometry_kept_without_geom() {
        let content = r#"{
            "type": "Feature",
            "id": "x",
            "geometry": {"type": "MultiPoint", "coordinates": [[0.0, 0.0], [1.0, 1.0]]},
            "properties": {}
        }"#;
        let features = features_from_geojson(content).unwrap();
        assert_eq!(features.len(), 1);
        assert!(features[0].geom.is_none());
    }

    #[test]
    fn test_bare_geometry() {
        let content = r#"{"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]]}"#;
        let features = features_from_geojson(content).unwrap();
        assert_eq!(features[0].code, "0");
        assert!(matches!(features[0].geom, Some(Geometry::LineString { .. })));
    }
}
