use std::path::PathBuf;

use clap::Args;
use gvstat_analysis::{
    age_distribution::{GenderAgeDistribution, PerCategory},
    cache::FingerprintBuilder,
};
use gvstat_data::participant::Role;
use gvstat_stats::descriptive::DescriptiveStats;
use serde::Serialize;

use crate::{command::AggregationArg, util};

const ARTIFACT_KIND: &str = "gender-age-distribution";

#[derive(Debug, Clone, Args)]
pub(crate) struct GenderDistArg {
    /// Path to the victim table CSV file
    #[arg(long, default_value = "victim_data.csv")]
    pub victims: PathBuf,
    /// Path to the suspect table CSV file
    #[arg(long, default_value = "suspect_data.csv")]
    pub suspects: PathBuf,
    /// Cache file of the computed distribution
    #[arg(long)]
    pub cache: Option<PathBuf>,
    /// Output file path (stdout if omitted or `-`)
    #[arg(long)]
    pub output: Option<PathBuf>,
    #[clap(flatten)]
    pub aggregation: AggregationArg,
}

#[derive(Debug, Serialize)]
struct GenderDistReport {
    #[serde(flatten)]
    distribution: GenderAgeDistribution,
    summaries: PerCategory<Option<DescriptiveStats>>,
}

pub(crate) fn run(arg: &GenderDistArg) -> anyhow::Result<()> {
    let config = arg.aggregation.config()?;

    let distribution = util::compute_cached(
        arg.cache.as_deref(),
        || {
            Ok(FingerprintBuilder::new(ARTIFACT_KIND)
                .param(&config)?
                .file(&arg.victims)?
                .file(&arg.suspects)?
                .finish())
        },
        || {
            let victims = util::read_role_table(Role::Victim, &arg.victims)?;
            let suspects = util::read_role_table(Role::Suspect, &arg.suspects)?;
            Ok(GenderAgeDistribution::compute(&config, &victims, &suspects))
        },
    )?;

    let report = GenderDistReport {
        summaries: distribution.summaries(),
        distribution,
    };
    util::save_json(&report, arg.output.as_deref())
}
