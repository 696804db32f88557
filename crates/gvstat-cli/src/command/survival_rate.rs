use std::path::PathBuf;

use clap::Args;
use gvstat_analysis::{cache::FingerprintBuilder, survival::SurvivalRates};
use gvstat_data::participant::Role;

use crate::{command::AggregationArg, util};

const ARTIFACT_KIND: &str = "survival-rates";

#[derive(Debug, Clone, Args)]
pub(crate) struct SurvivalRateArg {
    /// Path to the victim table CSV file
    #[arg(long, default_value = "victim_data.csv")]
    pub victims: PathBuf,
    /// Cache file of the computed curves
    #[arg(long)]
    pub cache: Option<PathBuf>,
    /// Output file path (stdout if omitted or `-`)
    #[arg(long)]
    pub output: Option<PathBuf>,
    #[clap(flatten)]
    pub aggregation: AggregationArg,
}

pub(crate) fn run(arg: &SurvivalRateArg) -> anyhow::Result<()> {
    let config = arg.aggregation.config()?;

    let rates = util::compute_cached(
        arg.cache.as_deref(),
        || {
            Ok(FingerprintBuilder::new(ARTIFACT_KIND)
                .param(&config)?
                .file(&arg.victims)?
                .finish())
        },
        || {
            let victims = util::read_role_table(Role::Victim, &arg.victims)?;
            Ok(SurvivalRates::compute(&config, &victims))
        },
    )?;

    util::save_json(&rates, arg.output.as_deref())
}
