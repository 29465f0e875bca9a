//! Plot record arrays, as returned by the plot listing API

use crate::error::{ParcelError, Result};
use crate::models::Feature;

use super::parse_feature_geometry;

/// Convert a JSON array of plot records into features.
///
/// Each record needs an object shape. `code` may be a string or number and
/// falls back to the array index; geometry is read from `geom` or `geometry`.
/// Every other member is kept as an attribute.
pub fn features_from_records(value: &serde_json::Value) -> Result<Vec<Feature>> {
    let records = value.as_array().ok_or_else(|| {
        ParcelError::Serialization("Expected a JSON array of plot records".to_string())
    })?;

    records
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            let object = record.as_object().ok_or_else(|| {
                ParcelError::Serialization(format!("Plot record {} is not an object", idx))
            })?;

            let code = match object.get("code") {
                Some(serde_json::Value::String(s)) => s.clone(),
                Some(serde_json::Value::Number(n)) => n.to_string(),
                _ => idx.to_string(),
            };

            let geom = parse_feature_geometry(
                &code,
                object.get("geom").or_else(|| object.get("geometry")),
            )?;

            let attributes = object
                .iter()
                .filter(|(k, _)| !matches!(k.as_str(), "code" | "geom" | "geometry"))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();

            Ok(Feature { code, geom, attributes })
        })
        .collect()
}
