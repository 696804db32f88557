//! City rankings and map points of the raw incident dataset

use std::collections::HashMap;

use gvstat_data::incident::Incident;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityCount {
    pub city: String,
    pub count: usize,
}

/// Number of cities the dashboard lists.
pub const DEFAULT_CITY_RANKING_LEN: usize = 20;

/// Cities by number of located incidents, most frequent first.
///
/// Only incidents with both coordinates are counted, the same subset the maps
/// are drawn from. Cities with equal counts are ordered by name. Incidents
/// without a city are ignored.
///
/// # Examples
///
/// ```
/// use gvstat_analysis::location::city_ranking;
/// use gvstat_data::incident::Incident;
///
/// let incidents = [
///     ("Chicago", Some(41.8)),
///     ("Baltimore", Some(39.3)),
///     ("Chicago", Some(41.9)),
///     ("Baltimore", None),
///     ("Baltimore", None),
///     ("", Some(0.0)),
/// ]
/// .map(|(city, latitude)| Incident {
///     city_or_county: city.into(),
///     latitude,
///     longitude: latitude.map(|_| -80.0),
///     ..Incident::default()
/// });
/// let ranking = city_ranking(&incidents);
/// assert_eq!(ranking[0].city, "Chicago");
/// assert_eq!(ranking[0].count, 2);
/// assert_eq!(ranking[1].count, 1);
/// assert_eq!(ranking.len(), 2);
/// ```
#[must_use]
pub fn city_ranking(incidents: &[Incident]) -> Vec<CityCount> {
    let mut counts = HashMap::<&str, usize>::new();
    for incident in incidents.iter().filter(|incident| incident.position().is_some()) {
        let city = incident.city_or_county.trim();
        if !city.is_empty() {
            *counts.entry(city).or_default() += 1;
        }
    }
    let mut ranking = counts
        .into_iter()
        .map(|(city, count)| CityCount {
            city: city.to_owned(),
            count,
        })
        .collect::<Vec<_>>();
    ranking.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.city.cmp(&b.city)));
    ranking
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

/// One incident of a city, ready to be drawn on a map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityIncident {
    pub longitude: f64,
    pub latitude: f64,
    pub address: String,
    pub n_killed: u32,
    pub n_injured: u32,
}

/// Incidents of `city` that carry coordinates, an address and casualty counts.
///
/// Incidents missing any of these fields are dropped.
#[must_use]
pub fn city_incidents(incidents: &[Incident], city: &str) -> Vec<CityIncident> {
    let city = city.trim();
    let selected = incidents
        .iter()
        .filter(|incident| incident.city_or_county.trim() == city)
        .filter_map(|incident| {
            let (longitude, latitude) = incident.position()?;
            let address = incident.address.as_deref().filter(|a| !a.trim().is_empty())?;
            Some(CityIncident {
                longitude,
                latitude,
                address: address.to_owned(),
                n_killed: incident.n_killed?,
                n_injured: incident.n_injured?,
            })
        })
        .collect::<Vec<_>>();
    log::debug!("selected {} incidents in {city}", selected.len());
    selected
}

/// Coordinates of every incident that has them.
#[must_use]
pub fn geo_points(incidents: &[Incident]) -> Vec<GeoPoint> {
    incidents
        .iter()
        .filter_map(Incident::position)
        .map(|(longitude, latitude)| GeoPoint {
            longitude,
            latitude,
        })
        .collect()
}

/// Point made of the median longitude and the median latitude.
///
/// Used to center a map view on a set of points.
///
/// # Examples
///
/// ```
/// use gvstat_analysis::location::{GeoPoint, median_center};
///
/// let points = [(-87.6, 41.8), (-87.7, 41.9), (-70.0, 10.0)]
///     .map(|(longitude, latitude)| GeoPoint { longitude, latitude });
/// let center = median_center(&points).unwrap();
/// assert_eq!((center.longitude, center.latitude), (-87.6, 41.8));
/// assert!(median_center(&[]).is_none());
/// ```
#[must_use]
pub fn median_center(points: &[GeoPoint]) -> Option<GeoPoint> {
    Some(GeoPoint {
        longitude: median(points.iter().map(|p| p.longitude))?,
        latitude: median(points.iter().map(|p| p.latitude))?,
    })
}

fn median<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut values = values.into_iter().filter(|v| v.is_finite()).collect::<Vec<_>>();
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some(f64::midpoint(values[mid - 1], values[mid]))
    } else {
        Some(values[mid])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incident(city: &str, position: Option<(f64, f64)>, address: Option<&str>) -> Incident {
        Incident {
            city_or_county: city.to_owned(),
            longitude: position.map(|p| p.0),
            latitude: position.map(|p| p.1),
            address: address.map(str::to_owned),
            n_killed: Some(1),
            n_injured: Some(2),
            ..Incident::default()
        }
    }

    #[test]
    fn test_city_ranking_ties_by_name() {
        let here = Some((-90.0, 35.0));
        let incidents = [
            incident("Memphis", here, None),
            incident("Houston", here, None),
            incident("Memphis", here, None),
            incident("Houston", here, None),
            incident("Akron", here, None),
        ];
        let ranking = city_ranking(&incidents);
        let cities = ranking.iter().map(|c| c.city.as_str()).collect::<Vec<_>>();
        assert_eq!(cities, ["Houston", "Memphis", "Akron"]);
    }

    #[test]
    fn test_city_ranking_counts_located_incidents_only() {
        let here = Some((-90.0, 35.0));
        let incidents = [
            incident("Memphis", here, None),
            incident("Memphis", here, None),
            incident("Akron", None, None),
            incident("Akron", None, None),
            incident("Akron", None, None),
            incident("Akron", here, None),
            incident("Tulsa", None, Some("Main St")),
        ];
        let ranking = city_ranking(&incidents);
        assert_eq!(
            ranking,
            [
                CityCount {
                    city: "Memphis".to_owned(),
                    count: 2
                },
                CityCount {
                    city: "Akron".to_owned(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_city_incidents_drop_incomplete() {
        let incidents = [
            incident("Houston", Some((-95.3, 29.7)), Some("Main St")),
            incident("Houston", None, Some("Elm St")),
            incident("Houston", Some((-95.4, 29.8)), None),
            incident("Dallas", Some((-96.8, 32.7)), Some("Oak St")),
        ];
        let selected = city_incidents(&incidents, "Houston");
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].address, "Main St");
        assert_eq!((selected[0].n_killed, selected[0].n_injured), (1, 2));
        assert!(city_incidents(&incidents, "Austin").is_empty());
    }

    #[test]
    fn test_geo_points_and_center() {
        let incidents = [
            incident("A", Some((1.0, 10.0)), None),
            incident("B", None, None),
            incident("C", Some((3.0, 30.0)), None),
        ];
        let points = geo_points(&incidents);
        assert_eq!(points.len(), 2);
        let center = median_center(&points).unwrap();
        assert_eq!((center.longitude, center.latitude), (2.0, 20.0));
    }
}
