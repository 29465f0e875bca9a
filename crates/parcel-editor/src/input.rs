//! Manual coordinate input.
//!
//! Text from the latitude/longitude fields is parsed strictly: anything that
//! is not a finite number inside the valid range is rejected, and the figure
//! is left unchanged.

use parcel_core::models::LatLng;

use crate::error::{EditorError, Result};

const MAX_LAT: f64 = 90.0;
const MAX_LNG: f64 = 180.0;

/// Parse the latitude and longitude fields into a position
pub fn parse_lat_lng(lat_text: &str, lng_text: &str) -> Result<LatLng> {
    let lat = parse_field("lat", lat_text, MAX_LAT)?;
    let lng = parse_field("lng", lng_text, MAX_LNG)?;
    Ok(LatLng::new(lat, lng))
}

fn parse_field(field: &str, text: &str, limit: f64) -> Result<f64> {
    let value: f64 = text.trim().parse().map_err(|_| invalid(field, text, "not a number"))?;

    if !value.is_finite() {
        return Err(invalid(field, text, "must be finite"));
    }
    if value.abs() > limit {
        return Err(invalid(field, text, &format!("must be within [-{}, {}]", limit, limit)));
    }
    Ok(value)
}

/// Reject pointer positions with NaN or infinite components
pub(crate) fn ensure_finite(position: LatLng) -> Result<LatLng> {
    if !position.lat.is_finite() {
        return Err(invalid("lat", &position.lat.to_string(), "must be finite"));
    }
    if !position.lng.is_finite() {
        return Err(invalid("lng", &position.lng.to_string(), "must be finite"));
    }
    Ok(position)
}

fn invalid(field: &str, value: &str, reason: &str) -> EditorError {
    EditorError::InvalidCoordinate {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(parse_lat_lng(" -6.2 ", "106.8").unwrap(), LatLng::new(-6.2, 106.8));
        assert_eq!(parse_lat_lng("90", "-180").unwrap(), LatLng::new(90.0, -180.0));
    }

    #[test]
    fn test_rejects_non_numeric() {
        match parse_lat_lng("abc", "1.0") {
            Err(EditorError::InvalidCoordinate { field, value, .. }) => {
                assert_eq!(field, "lat");
                assert_eq!(value, "abc");
            }
            other => panic!("expected InvalidCoordinate, got {:?}", other),
        }
        assert!(parse_lat_lng("1.0", "").is_err());
    }

    #[test]
    fn test_rejects_nan_and_infinity() {
        assert!(parse_lat_lng("NaN", "1.0").is_err());
        assert!(parse_lat_lng("1.0", "inf").is_err());
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(parse_lat_lng("90.5", "0").is_err());
        match parse_lat_lng("0", "181") {
            Err(EditorError::InvalidCoordinate { field, .. }) => assert_eq!(field, "lng"),
            other => panic!("expected InvalidCoordinate, got {:?}", other),
        }
    }

    #[test]
    fn test_ensure_finite() {
        assert!(ensure_finite(LatLng::new(1.0, 2.0)).is_ok());
        assert!(ensure_finite(LatLng::new(f64::NAN, 2.0)).is_err());
    }
}
