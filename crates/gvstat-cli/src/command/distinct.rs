use std::path::PathBuf;

use clap::{Args, ValueEnum};
use gvstat_analysis::distinct::{ParticipantColumn, distinct_column_values};

use crate::util;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ColumnArg {
    Type,
    Age,
    AgeGroup,
    Gender,
    Status,
}

impl From<ColumnArg> for ParticipantColumn {
    fn from(column: ColumnArg) -> Self {
        match column {
            ColumnArg::Type => ParticipantColumn::Type,
            ColumnArg::Age => ParticipantColumn::Age,
            ColumnArg::AgeGroup => ParticipantColumn::AgeGroup,
            ColumnArg::Gender => ParticipantColumn::Gender,
            ColumnArg::Status => ParticipantColumn::Status,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub(crate) struct DistinctArg {
    /// Path to the raw incident CSV file
    pub incidents: PathBuf,
    /// Participant column to inspect
    #[arg(long, value_enum, default_value_t = ColumnArg::Type)]
    pub column: ColumnArg,
    /// Output file path (stdout if omitted or `-`)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &DistinctArg) -> anyhow::Result<()> {
    let incidents = util::read_incidents_file(&arg.incidents)?;
    let values = distinct_column_values(&incidents, arg.column.into());
    util::save_json(&values, arg.output.as_deref())
}
