//! Vocabulary of the packed participant columns

use std::collections::BTreeSet;

use gvstat_data::{field_map::distinct_values, incident::Incident};

pub use gvstat_data::incident::ParticipantColumn;

/// Distinct values of one packed participant column across all incidents.
///
/// # Examples
///
/// ```
/// use gvstat_analysis::distinct::{ParticipantColumn, distinct_column_values};
/// use gvstat_data::incident::Incident;
///
/// let incidents = ["0::Male||1::Female", "0::Male", "NA"].map(|genders| Incident {
///     participant_gender: genders.into(),
///     ..Incident::default()
/// });
/// let values = distinct_column_values(&incidents, ParticipantColumn::Gender);
/// assert_eq!(values.into_iter().collect::<Vec<_>>(), ["Female", "Male"]);
/// ```
#[must_use]
pub fn distinct_column_values(incidents: &[Incident], column: ParticipantColumn) -> BTreeSet<String> {
    let mappings = incidents
        .iter()
        .map(|incident| incident.column_mapping(column))
        .collect::<Vec<_>>();
    let values = distinct_values(&mappings);
    log::debug!("found {} distinct values in {column:?}", values.len());
    values
}
