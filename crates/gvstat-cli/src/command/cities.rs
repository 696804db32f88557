use std::path::PathBuf;

use clap::Args;
use gvstat_analysis::location::{
    CityIncident, DEFAULT_CITY_RANKING_LEN, GeoPoint, city_incidents, city_ranking,
    median_center,
};
use serde::Serialize;

use crate::util;

#[derive(Debug, Clone, Args)]
pub(crate) struct CitiesArg {
    /// Path to the raw incident CSV file
    pub incidents: PathBuf,
    /// List the incidents of this city instead of ranking cities
    #[arg(long)]
    pub city: Option<String>,
    /// Only keep the first N cities of the ranking (0 keeps all)
    #[arg(long, default_value_t = DEFAULT_CITY_RANKING_LEN)]
    pub top: usize,
    /// Output file path (stdout if omitted or `-`)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct CityReport {
    city: String,
    center: Option<GeoPoint>,
    incidents: Vec<CityIncident>,
}

pub(crate) fn run(arg: &CitiesArg) -> anyhow::Result<()> {
    let incidents = util::read_incidents_file(&arg.incidents)?;

    let Some(city) = &arg.city else {
        let mut ranking = city_ranking(&incidents);
        if arg.top > 0 {
            ranking.truncate(arg.top);
        }
        return util::save_json(&ranking, arg.output.as_deref());
    };

    let selected = city_incidents(&incidents, city);
    if selected.is_empty() {
        log::warn!("no located incidents in {city}");
    }
    let points = selected
        .iter()
        .map(|incident| GeoPoint {
            longitude: incident.longitude,
            latitude: incident.latitude,
        })
        .collect::<Vec<_>>();
    let report = CityReport {
        city: city.clone(),
        center: median_center(&points),
        incidents: selected,
    };
    util::save_json(&report, arg.output.as_deref())
}
