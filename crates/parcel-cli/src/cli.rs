use clap::{Parser, Subcommand};
use parcel_core::config::AreaMethod;
use std::path::PathBuf;

use crate::commands::edit::{parse_edit_op, EditOp};

/// Parcel - geometry editing and overlap detection for land parcels
#[derive(Parser, Debug)]
#[command(name = "parcel")]
#[command(about = "Geometry editing and overlap detection for land parcels", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (TOML); ./parcel.toml is used when present
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load a geometry into the editor and show its vertex handles
    Inspect(InspectArgs),

    /// Apply vertex edits to a geometry and print the result in storage format
    Edit(EditArgs),

    /// Detect overlapping polygons in a feature file
    Overlaps(OverlapsArgs),

    /// Show the effective configuration and where each value comes from
    Config,
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// GeoJSON geometry, Feature or GeometryCollection
    pub path: PathBuf,
}

#[derive(Parser, Debug)]
pub struct EditArgs {
    /// GeoJSON geometry, Feature or GeometryCollection
    pub path: PathBuf,

    /// Edit operation, applied in order: insert:LAT,LNG | move:INDEX:LAT,LNG | delete:INDEX | clear
    #[arg(long = "op", value_name = "OP", required = true, value_parser = parse_edit_op)]
    pub ops: Vec<EditOp>,

    /// Handle hit-test radius in degrees
    #[arg(long, value_name = "DEGREES")]
    pub hit_tolerance: Option<f64>,
}

#[derive(Parser, Debug)]
pub struct OverlapsArgs {
    /// GeoJSON FeatureCollection or JSON array of plot records
    pub path: PathBuf,

    /// Area measurement method
    #[arg(long, value_enum)]
    pub area: Option<AreaArg>,

    /// Test every polygon pair instead of pruning with the spatial index
    #[arg(long)]
    pub no_index: bool,
}

/// Area method selection
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum AreaArg {
    /// Coordinate units squared, no reprojection
    Planar,
    /// Square metres for WGS84 lon/lat input
    Geodesic,
}

impl From<AreaArg> for AreaMethod {
    fn from(arg: AreaArg) -> Self {
        match arg {
            AreaArg::Planar => AreaMethod::Planar,
            AreaArg::Geodesic => AreaMethod::Geodesic,
        }
    }
}
