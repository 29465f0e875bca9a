//! Edit command implementation

use crate::cli::EditArgs;
use crate::config_loader::load_config_with_overrides;
use crate::errors;
use crate::output::OutputWriter;
use crate::output_types::EditOutput;
use anyhow::Result;
use parcel_core::config::CliConfigOverrides;
use parcel_core::formats::read_geometry;
use parcel_core::storage::to_storage_format;
use parcel_core::models::LatLng;
use parcel_editor::{parse_lat_lng, DeleteOutcome, EditorSession};
use std::fmt;
use std::path::Path;

/// One `--op` argument
#[derive(Debug, Clone, PartialEq)]
pub enum EditOp {
    /// Click at a position; inserts on the closest edge
    Insert { lat: f64, lng: f64 },
    /// Reposition a vertex of the first part from coordinate text
    Move { index: usize, lat: String, lng: String },
    Delete { index: usize },
    Clear,
}

impl fmt::Display for EditOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditOp::Insert { lat, lng } => write!(f, "insert:{},{}", lat, lng),
            EditOp::Move { index, lat, lng } => write!(f, "move:{}:{},{}", index, lat, lng),
            EditOp::Delete { index } => write!(f, "delete:{}", index),
            EditOp::Clear => write!(f, "clear"),
        }
    }
}

/// Parse `insert:LAT,LNG`, `move:INDEX:LAT,LNG`, `delete:INDEX` or `clear`
pub fn parse_edit_op(s: &str) -> std::result::Result<EditOp, String> {
    let (name, rest) = s.split_once(':').unwrap_or((s, ""));

    match name {
        "insert" => {
            let (lat, lng) = split_pair(rest)?;
            let position = parse_lat_lng(lat, lng).map_err(|e| e.to_string())?;
            Ok(EditOp::Insert { lat: position.lat, lng: position.lng })
        }
        "move" => {
            let (index, pair) = rest
                .split_once(':')
                .ok_or_else(|| format!("expected move:INDEX:LAT,LNG, got '{}'", s))?;
            let (lat, lng) = split_pair(pair)?;
            Ok(EditOp::Move { index: parse_index(index)?, lat: lat.to_string(), lng: lng.to_string() })
        }
        "delete" => Ok(EditOp::Delete { index: parse_index(rest)? }),
        "clear" if rest.is_empty() => Ok(EditOp::Clear),
        _ => Err(format!(
            "unknown operation '{}'. Use insert:LAT,LNG, move:INDEX:LAT,LNG, delete:INDEX or clear",
            s
        )),
    }
}

fn split_pair(s: &str) -> std::result::Result<(&str, &str), String> {
    s.split_once(',').ok_or_else(|| format!("expected LAT,LNG, got '{}'", s))
}

fn parse_index(s: &str) -> std::result::Result<usize, String> {
    s.trim().parse().map_err(|_| format!("invalid vertex index '{}'", s))
}

pub fn execute(args: EditArgs, config_file: Option<&Path>, output: &OutputWriter) -> Result<()> {
    if !args.path.exists() {
        return Err(errors::input_not_found(&args.path).into());
    }

    let overrides = CliConfigOverrides { hit_tolerance: args.hit_tolerance, ..Default::default() };
    let config = load_config_with_overrides(config_file, overrides)?;
    let geometry = read_geometry(&args.path)?;

    let mut session = EditorSession::new(config.editor_settings());
    session
        .try_load(&geometry)
        .map_err(|e| errors::unloadable_geometry(&args.path, e))?;

    for op in &args.ops {
        apply(&mut session, op, output)?;
    }

    let stored = session.current_geometry().map(to_storage_format);

    if output.is_json() {
        return output.result(EditOutput { operations: args.ops.len(), geometry: stored });
    }

    output.section("Result");
    match stored {
        Some(geometry) => output.data(&geometry)?,
        None => output.info("Figure deleted"),
    }
    Ok(())
}

fn apply(session: &mut EditorSession, op: &EditOp, output: &OutputWriter) -> Result<()> {
    if session.figure().is_none() {
        return Err(errors::no_active_figure(op).into());
    }

    match op {
        EditOp::Insert { lat, lng } => {
            match session.insert_at(LatLng::new(*lat, *lng))? {
                Some(insertion) => {
                    let index = session.handle(insertion.handle).map(|h| h.index).unwrap_or_default();
                    output.success(format!("{}: inserted vertex {}", op, index));
                }
                None => output.warning(format!("{}: position is on an existing vertex, nothing inserted", op)),
            }
        }
        EditOp::Move { index, lat, lng } => {
            select_vertex(session, *index)?;
            session.set_selected_position(lat, lng)?;
            output.success(format!("{}: moved vertex {}", op, index));
        }
        EditOp::Delete { index } => {
            select_vertex(session, *index)?;
            match session.delete_selected()? {
                DeleteOutcome::Deleted(_) => output.success(format!("{}: deleted vertex {}", op, index)),
                DeleteOutcome::FigureDeletionRequired => {
                    let minimum = session.figure().map(|f| f.kind().min_vertices()).unwrap_or_default();
                    return Err(errors::figure_deletion_required(*index, minimum).into());
                }
            }
        }
        EditOp::Clear => {
            session.clear();
            output.success("clear: figure deleted");
        }
    }
    Ok(())
}

fn select_vertex(session: &mut EditorSession, index: usize) -> Result<()> {
    let Some(id) = session.handle_at(0, index).map(|h| h.id) else {
        let count = session.figure().and_then(|f| f.part(0)).map(|p| p.len()).unwrap_or_default();
        return Err(errors::vertex_not_found(index, count).into());
    };
    session.select(id)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_edit_ops() {
        assert_eq!(parse_edit_op("insert:0,2").unwrap(), EditOp::Insert { lat: 0.0, lng: 2.0 });
        assert_eq!(
            parse_edit_op("move:3:-6.2,106.8").unwrap(),
            EditOp::Move { index: 3, lat: "-6.2".to_string(), lng: "106.8".to_string() }
        );
        assert_eq!(parse_edit_op("delete:1").unwrap(), EditOp::Delete { index: 1 });
        assert_eq!(parse_edit_op("clear").unwrap(), EditOp::Clear);
    }

    #[test]
    fn test_parse_edit_op_errors() {
        assert!(parse_edit_op("insert:abc,2").is_err());
        assert!(parse_edit_op("insert:95,2").is_err());
        assert!(parse_edit_op("move:1").is_err());
        assert!(parse_edit_op("delete:x").is_err());
        assert!(parse_edit_op("rotate:90").is_err());
    }

    #[test]
    fn test_display_roundtrips() {
        for raw in ["insert:0,2", "move:3:1.5,2", "delete:1", "clear"] {
            let op = parse_edit_op(raw).unwrap();
            assert_eq!(parse_edit_op(&op.to_string()).unwrap(), op);
        }
    }
}
