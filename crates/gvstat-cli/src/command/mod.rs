use clap::{Args, Parser, Subcommand};
use gvstat_analysis::config::{
    AggregationConfig, DEFAULT_MAX_AGE, DEFAULT_SURVIVAL_MAX_DISPLAY_AGE,
    DEFAULT_SURVIVAL_WINDOW_RADIUS,
};

use self::{
    case_number::CaseNumberArg, cities::CitiesArg, distinct::DistinctArg,
    gender_dist::GenderDistArg, heatmap::HeatmapArg, split::SplitArg,
    survival_rate::SurvivalRateArg,
};

mod case_number;
mod cities;
mod distinct;
mod gender_dist;
mod heatmap;
mod split;
mod survival_rate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log debug messages (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Split the raw incident dataset into victim and suspect tables
    Split(#[clap(flatten)] SplitArg),
    /// Age distributions of male/female victims and suspects
    GenderDist(#[clap(flatten)] GenderDistArg),
    /// Smoothed survival rate of victims by gender and age
    SurvivalRate(#[clap(flatten)] SurvivalRateArg),
    /// Number of incidents per calendar day
    CaseNumber(#[clap(flatten)] CaseNumberArg),
    /// Distinct values of a packed participant column
    Distinct(#[clap(flatten)] DistinctArg),
    /// City ranking, or the incidents of one city
    Cities(#[clap(flatten)] CitiesArg),
    /// Coordinates of every incident
    Heatmap(#[clap(flatten)] HeatmapArg),
}

/// Parameters shared by the age statistics commands
#[derive(Debug, Clone, Args)]
pub(crate) struct AggregationArg {
    /// Exclusive upper bound on counted ages
    #[arg(long, default_value_t = DEFAULT_MAX_AGE)]
    max_age: u32,
    /// Exclusive upper bound on the ages of the survival curves
    #[arg(long, default_value_t = DEFAULT_SURVIVAL_MAX_DISPLAY_AGE)]
    survival_max_display_age: u32,
    /// Half-width of the survival smoothing window
    #[arg(long, default_value_t = DEFAULT_SURVIVAL_WINDOW_RADIUS)]
    survival_window_radius: u32,
}

impl AggregationArg {
    pub(crate) fn config(&self) -> anyhow::Result<AggregationConfig> {
        let config = AggregationConfig {
            max_age: self.max_age,
            survival_max_display_age: self.survival_max_display_age,
            survival_window_radius: self.survival_window_radius,
        };
        config.validate()?;
        log::debug!("aggregation config: {config:?}");
        Ok(config)
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logger(args.verbose);
    match args.mode {
        Mode::Split(arg) => split::run(&arg)?,
        Mode::GenderDist(arg) => gender_dist::run(&arg)?,
        Mode::SurvivalRate(arg) => survival_rate::run(&arg)?,
        Mode::CaseNumber(arg) => case_number::run(&arg)?,
        Mode::Distinct(arg) => distinct::run(&arg)?,
        Mode::Cities(arg) => cities::run(&arg)?,
        Mode::Heatmap(arg) => heatmap::run(&arg)?,
    }
    Ok(())
}

fn init_logger(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_flags() {
        let args = CommandArgs::try_parse_from([
            "gvstat",
            "-v",
            "survival-rate",
            "--victims",
            "victim_data.csv",
            "--survival-max-display-age",
            "60",
        ])
        .unwrap();
        assert!(args.verbose);
        let Mode::SurvivalRate(arg) = args.mode else {
            panic!("expected survival-rate mode");
        };
        let config = arg.aggregation.config().unwrap();
        assert_eq!(config.survival_max_display_age, 60);
        assert_eq!(config.max_age, DEFAULT_MAX_AGE);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let arg = AggregationArg {
            max_age: 50,
            survival_max_display_age: 85,
            survival_window_radius: 1,
        };
        assert!(arg.config().is_err());

        let oversized = AggregationArg {
            max_age: 4_000_000_000,
            survival_max_display_age: 85,
            survival_window_radius: 1,
        };
        let err = oversized.config().unwrap_err();
        assert!(err.to_string().contains("4000000000"), "{err:#}");
    }

    #[test]
    fn test_clap_definition() {
        use clap::CommandFactory as _;
        CommandArgs::command().debug_assert();
    }
}
