//! Inspect command implementation

use crate::cli::InspectArgs;
use crate::config_loader::load_config;
use crate::errors;
use crate::output::OutputWriter;
use crate::output_types::{HandleInfo, InspectOutput};
use anyhow::Result;
use parcel_core::formats::read_geometry;
use parcel_editor::{EditorSession, ViewRequest};
use std::path::Path;
use tabled::Tabled;

pub fn execute(args: InspectArgs, config_file: Option<&Path>, output: &OutputWriter) -> Result<()> {
    if !args.path.exists() {
        return Err(errors::input_not_found(&args.path).into());
    }

    let config = load_config(config_file)?;
    let geometry = read_geometry(&args.path)?;

    let mut session = EditorSession::new(config.editor_settings());
    let view = session
        .try_load(&geometry)
        .map_err(|e| errors::unloadable_geometry(&args.path, e))?;

    let Some(figure) = session.figure() else {
        return Err(errors::unloadable_geometry(&args.path, "no figure was loaded").into());
    };

    let handles: Vec<HandleInfo> = session
        .handles()
        .iter()
        .map(|h| HandleInfo {
            part: h.owner.part,
            index: h.index,
            lat: h.position.lat,
            lng: h.position.lng,
        })
        .collect();

    if output.is_json() {
        return output.result(InspectOutput {
            kind: figure.kind(),
            parts: figure.parts().len(),
            vertex_count: figure.vertex_count(),
            handles,
            view,
        });
    }

    output.section("Figure");
    output.kv("Type", figure.kind());
    output.kv("Parts", figure.parts().len());
    output.kv("Vertices", figure.vertex_count());
    output.kv("View", describe_view(view.as_ref()));

    #[derive(Tabled)]
    struct HandleRow {
        #[tabled(rename = "Part")]
        part: usize,
        #[tabled(rename = "Index")]
        index: usize,
        #[tabled(rename = "Lat")]
        lat: f64,
        #[tabled(rename = "Lng")]
        lng: f64,
    }

    output.section("Vertex Handles");
    output.table(
        handles
            .into_iter()
            .map(|h| HandleRow { part: h.part, index: h.index, lat: h.lat, lng: h.lng })
            .collect(),
    );

    Ok(())
}

fn describe_view(view: Option<&ViewRequest>) -> String {
    match view {
        Some(ViewRequest::FitBounds { bounds, padding_px, max_zoom }) => format!(
            "fit [{}, {}] - [{}, {}], padding {}px, max zoom {}",
            bounds.min_lat, bounds.min_lng, bounds.max_lat, bounds.max_lng, padding_px, max_zoom
        ),
        Some(ViewRequest::Center { center, zoom }) => {
            format!("center on [{}, {}] at zoom {}", center.lat, center.lng, zoom)
        }
        None => "unchanged".to_string(),
    }
}
