use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use gvstat_analysis::seasonal::{CaseCountByDay, DEFAULT_SINCE};
use gvstat_data::participant::Role;

use crate::util;

#[derive(Debug, Clone, Args)]
pub(crate) struct CaseNumberArg {
    /// Path to the victim table CSV file
    #[arg(long, default_value = "victim_data.csv")]
    pub victims: PathBuf,
    /// Only count incidents dated after this day (YYYY-MM-DD)
    #[arg(long, default_value = DEFAULT_SINCE)]
    pub since: NaiveDate,
    /// Output file path (stdout if omitted or `-`)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &CaseNumberArg) -> anyhow::Result<()> {
    let victims = util::read_role_table(Role::Victim, &arg.victims)?;
    let counts = CaseCountByDay::compute(&victims, arg.since);
    if let Some((day, count)) = counts.busiest_day() {
        log::info!("busiest day: {day} ({count} incidents)");
    }
    util::save_json(&counts, arg.output.as_deref())
}
