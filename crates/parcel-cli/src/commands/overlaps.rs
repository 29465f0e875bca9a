//! Overlaps command implementation

use crate::cli::OverlapsArgs;
use crate::config_loader::load_config_with_overrides;
use crate::errors;
use crate::output::OutputWriter;
use crate::output_types::{OverlapItem, OverlapsOutput};
use anyhow::Result;
use parcel_core::config::CliConfigOverrides;
use parcel_core::formats::read_features;
use parcel_geo::{collect_polygons, find_source_features, OverlapDetector};
use std::path::Path;
use tabled::Tabled;

pub fn execute(args: OverlapsArgs, config_file: Option<&Path>, output: &OutputWriter) -> Result<()> {
    if !args.path.exists() {
        return Err(errors::input_not_found(&args.path).into());
    }

    let overrides = CliConfigOverrides {
        area_method: args.area.map(Into::into),
        spatial_index: args.no_index.then_some(false),
        ..Default::default()
    };
    let config = load_config_with_overrides(config_file, overrides)?;
    let settings = config.overlap_settings();

    let features = read_features(&args.path)?;
    let polygons = collect_polygons(&features);
    let records = OverlapDetector::new(settings).compute(&polygons);

    let intersections: Vec<OverlapItem> = records
        .iter()
        .map(|record| {
            let (first, second) = find_source_features(record, &features);
            OverlapItem {
                id: record.id.clone(),
                feature1: first.map(|f| f.code.clone()),
                feature2: second.map(|f| f.code.clone()),
                area: record.area,
                intersection: record.intersection.clone(),
            }
        })
        .collect();

    if output.is_json() {
        return output.result(OverlapsOutput {
            feature_count: features.len(),
            polygon_count: polygons.len(),
            area_method: settings.area_method,
            spatial_index: settings.spatial_index,
            intersections,
        });
    }

    output.section("Overlaps");
    output.kv("Features", features.len());
    output.kv("Polygons", polygons.len());
    output.kv("Area method", format!("{:?}", settings.area_method));

    if intersections.is_empty() {
        output.info("No overlapping polygons found");
        return Ok(());
    }

    #[derive(Tabled)]
    struct OverlapRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Feature A")]
        feature1: String,
        #[tabled(rename = "Feature B")]
        feature2: String,
        #[tabled(rename = "Area")]
        area: String,
    }

    let missing = || "-".to_string();
    let rows: Vec<OverlapRow> = intersections
        .into_iter()
        .map(|item| OverlapRow {
            id: item.id,
            feature1: item.feature1.unwrap_or_else(missing),
            feature2: item.feature2.unwrap_or_else(missing),
            area: format!("{:.6}", item.area),
        })
        .collect();

    output.table(rows);
    output.success(format!("{} overlap(s) found", records.len()));

    Ok(())
}
