use std::path::PathBuf;

use clap::Args;
use gvstat_analysis::location::{GeoPoint, geo_points, median_center};
use serde::Serialize;

use crate::util;

#[derive(Debug, Clone, Args)]
pub(crate) struct HeatmapArg {
    /// Path to the raw incident CSV file
    pub incidents: PathBuf,
    /// Output file path (stdout if omitted or `-`)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct HeatmapReport {
    center: Option<GeoPoint>,
    points: Vec<GeoPoint>,
}

pub(crate) fn run(arg: &HeatmapArg) -> anyhow::Result<()> {
    let incidents = util::read_incidents_file(&arg.incidents)?;
    let points = geo_points(&incidents);
    log::info!(
        "{} of {} incidents have coordinates",
        points.len(),
        incidents.len()
    );
    let report = HeatmapReport {
        center: median_center(&points),
        points,
    };
    util::save_json(&report, arg.output.as_deref())
}
