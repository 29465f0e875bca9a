//! Integration tests for layered configuration
//!
//! These tests verify that configuration loading follows the correct precedence:
//! CLI arguments > Environment variables > Config file > Defaults

use parcel_core::config::{AreaMethod, CliConfigOverrides, ConfigSource, LayeredConfig};
use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;

fn clear_env() {
    for key in [
        "PARCEL_HIT_TOLERANCE",
        "PARCEL_DRAG_THRESHOLD_PX",
        "PARCEL_FIT_PADDING_PX",
        "PARCEL_MAX_ZOOM",
        "PARCEL_POINT_ZOOM",
        "PARCEL_AREA_METHOD",
        "PARCEL_SPATIAL_INDEX",
    ] {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_env_overrides_file() {
    clear_env();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
area_method = "geodesic"
max_zoom = 17
"#
    )
    .unwrap();

    env::set_var("PARCEL_MAX_ZOOM", "19");

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap().load_from_env();

    assert_eq!(config.max_zoom.value, 19);
    assert_eq!(config.max_zoom.source, ConfigSource::Environment);
    assert_eq!(config.area_method.value, AreaMethod::Geodesic);
    assert_eq!(config.area_method.source, ConfigSource::File);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_env_values_are_ignored() {
    clear_env();
    env::set_var("PARCEL_HIT_TOLERANCE", "not-a-number");
    env::set_var("PARCEL_AREA_METHOD", "mercator");
    env::set_var("PARCEL_SPATIAL_INDEX", "maybe");

    let config = LayeredConfig::with_defaults().load_from_env();

    assert_eq!(config.hit_tolerance.value, 1e-5);
    assert_eq!(config.hit_tolerance.source, ConfigSource::Default);
    assert_eq!(config.area_method.value, AreaMethod::Planar);
    assert!(config.spatial_index.value);

    clear_env();
}

#[test]
#[serial]
fn test_cli_overrides_env() {
    clear_env();
    env::set_var("PARCEL_AREA_METHOD", "geodesic");
    env::set_var("PARCEL_SPATIAL_INDEX", "off");

    let mut config = LayeredConfig::with_defaults().load_from_env();
    assert_eq!(config.area_method.value, AreaMethod::Geodesic);
    assert!(!config.spatial_index.value);

    config.update_from_cli(CliConfigOverrides {
        area_method: Some(AreaMethod::Planar),
        ..Default::default()
    });

    assert_eq!(config.area_method.value, AreaMethod::Planar);
    assert_eq!(config.area_method.source, ConfigSource::Cli);
    assert_eq!(config.spatial_index.source, ConfigSource::Environment);

    clear_env();
}

#[test]
fn test_missing_file_is_config_error() {
    let result = LayeredConfig::with_defaults().load_from_file("/nonexistent/parcel.toml");
    assert!(result.is_err());
}
