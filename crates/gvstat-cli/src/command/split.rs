use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use gvstat_data::incident::split_incidents;

use crate::util;

#[derive(Debug, Clone, Args)]
pub(crate) struct SplitArg {
    /// Path to the raw incident CSV file
    pub incidents: PathBuf,
    /// Output path of the victim table
    #[arg(long, default_value = "victim_data.csv")]
    pub victims_out: PathBuf,
    /// Output path of the suspect table
    #[arg(long, default_value = "suspect_data.csv")]
    pub suspects_out: PathBuf,
}

pub(crate) fn run(arg: &SplitArg) -> anyhow::Result<()> {
    let incidents = util::read_incidents_file(&arg.incidents)?;
    let (victims, suspects) = split_incidents(&incidents);

    for (table, path) in [(&victims, &arg.victims_out), (&suspects, &arg.suspects_out)] {
        table
            .write(path)
            .with_context(|| format!("Failed to write {} table: {}", table.role, path.display()))?;
        log::info!("wrote {} {} rows to {}", table.rows.len(), table.role, path.display());
    }
    Ok(())
}
