//! Rows of the raw incident dataset
//!
//! The raw dataset has one row per incident. Participants are spread over
//! several packed columns (see [`field_map`](crate::field_map)) that share the
//! participant index as key:
//!
//! ```text
//! participant_type   = 0::Victim||1::Subject-Suspect
//! participant_age    = 0::25||1::19
//! participant_gender = 0::Male||1::Male
//! participant_status = 0::Injured||1::Unharmed, Arrested
//! ```
//!
//! [`split_incidents`] joins these columns into per-role tables, the input
//! of the age statistics.

use std::{fs::File, io, path::Path};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    dataset::{DatasetError, ParticipantRow, RoleTable, parse_date},
    field_map::{FieldMapping, parse_field_mapping},
    participant::{Gender, Participant, Role, parse_age},
};

/// One incident of the raw dataset.
///
/// Unknown columns are ignored and absent columns are empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub city_or_county: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub n_killed: Option<u32>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub n_injured: Option<u32>,
    #[serde(default)]
    pub participant_type: String,
    #[serde(default)]
    pub participant_age: String,
    #[serde(default)]
    pub participant_age_group: String,
    #[serde(default)]
    pub participant_gender: String,
    #[serde(default)]
    pub participant_status: String,
}

impl Incident {
    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }

    /// Coordinates as `(longitude, latitude)`, if both are present.
    #[must_use]
    pub fn position(&self) -> Option<(f64, f64)> {
        Some((self.longitude?, self.latitude?))
    }

    /// Participants of this incident with the given role.
    ///
    /// Participants are ordered by their index in the incident.
    ///
    /// # Examples
    ///
    /// ```
    /// use gvstat_data::{
    ///     incident::Incident,
    ///     participant::{Gender, Role},
    /// };
    ///
    /// let incident = Incident {
    ///     participant_type: "0::Victim||1::Subject-Suspect".into(),
    ///     participant_age: "0::25||1::19".into(),
    ///     participant_gender: "0::Male||1::Female".into(),
    ///     participant_status: "0::Killed||1::Unharmed, Arrested".into(),
    ///     ..Incident::default()
    /// };
    /// let suspects = incident.participants(Role::Suspect);
    /// assert_eq!(suspects.len(), 1);
    /// assert_eq!(suspects[0].age, Some(19));
    /// assert_eq!(suspects[0].gender, Gender::Female);
    /// assert!(incident.participants(Role::Victim)[0].is_killed());
    /// ```
    #[must_use]
    pub fn participants(&self, role: Role) -> Vec<Participant> {
        let types = parse_field_mapping(&self.participant_type);
        let ages = parse_field_mapping(&self.participant_age);
        let genders = parse_field_mapping(&self.participant_gender);
        let statuses = parse_field_mapping(&self.participant_status);

        let mut keys = types
            .iter()
            .filter(|(_, ty)| Role::from_participant_type(ty) == Some(role))
            .map(|(key, _)| key)
            .collect::<Vec<_>>();
        keys.sort_by_key(|key| (key.parse::<u64>().unwrap_or(u64::MAX), *key));

        keys.into_iter()
            .map(|key| {
                Participant::new(
                    ages.get(key).and_then(parse_age),
                    Gender::parse(genders.get(key).unwrap_or_default()),
                    statuses.get(key).map(str::to_owned),
                )
            })
            .collect()
    }

    /// Parsed mapping of one packed participant column.
    #[must_use]
    pub fn column_mapping(&self, column: ParticipantColumn) -> FieldMapping {
        parse_field_mapping(self.column(column))
    }

    fn column(&self, column: ParticipantColumn) -> &str {
        match column {
            ParticipantColumn::Type => &self.participant_type,
            ParticipantColumn::Age => &self.participant_age,
            ParticipantColumn::AgeGroup => &self.participant_age_group,
            ParticipantColumn::Gender => &self.participant_gender,
            ParticipantColumn::Status => &self.participant_status,
        }
    }
}

/// The packed per-participant columns of the incident dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantColumn {
    Type,
    Age,
    AgeGroup,
    Gender,
    Status,
}

/// Reads the raw incident dataset.
///
/// Records that cannot be decoded are skipped with a warning.
pub fn read_incidents<P>(path: P) -> Result<Vec<Incident>, DatasetError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DatasetError::Open {
        path: path.to_owned(),
        source,
    })?;
    let mut reader = csv::Reader::from_reader(io::BufReader::new(file));

    let mut incidents = vec![];
    for (line, record) in reader.deserialize::<Incident>().enumerate() {
        match record {
            Ok(incident) => incidents.push(incident),
            Err(err) if err.is_io_error() => {
                return Err(DatasetError::Csv {
                    path: path.to_owned(),
                    source: err,
                });
            }
            Err(err) => log::warn!("{}: skipping record {}: {err}", path.display(), line + 1),
        }
    }
    log::info!("loaded {} incidents from {}", incidents.len(), path.display());
    Ok(incidents)
}

/// Splits raw incidents into a victim table and a suspect table.
///
/// An incident contributes a row to a table only if it has at least one
/// participant with that role. Incidents without a valid date are dropped.
#[must_use]
pub fn split_incidents(incidents: &[Incident]) -> (RoleTable, RoleTable) {
    let mut victims = RoleTable::new(Role::Victim);
    let mut suspects = RoleTable::new(Role::Suspect);
    let mut undated = 0;

    for incident in incidents {
        let Some(date) = incident.date() else {
            undated += 1;
            continue;
        };
        for table in [&mut victims, &mut suspects] {
            let participants = incident.participants(table.role);
            if !participants.is_empty() {
                table.rows.push(ParticipantRow { date, participants });
            }
        }
    }

    if undated > 0 {
        log::warn!("dropped {undated} incidents without a valid date");
    }
    (victims, suspects)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn incident(date: &str, types: &str, ages: &str, genders: &str) -> Incident {
        Incident {
            date: date.to_owned(),
            participant_type: types.to_owned(),
            participant_age: ages.to_owned(),
            participant_gender: genders.to_owned(),
            ..Incident::default()
        }
    }

    #[test]
    fn test_participants_sorted_by_index() {
        let incident = incident(
            "2016-01-01",
            "10::Victim||2::Victim||0::Victim",
            "10::40||2::20||0::5",
            "NA",
        );
        let ages = incident
            .participants(Role::Victim)
            .iter()
            .map(|p| p.age)
            .collect::<Vec<_>>();
        assert_eq!(ages, [Some(5), Some(20), Some(40)]);
    }

    #[test]
    fn test_split_incidents() {
        let incidents = [
            incident("2016-01-01", "0::Victim||1::Subject-Suspect", "0::30||1::18", "0::Male||1::Male"),
            incident("2016-01-02", "0::Victim", "0::44", "0::Female"),
            incident("", "0::Victim", "0::44", "0::Female"),
            incident("2016-01-03", "NA", "NA", "NA"),
        ];
        let (victims, suspects) = split_incidents(&incidents);
        assert_eq!(victims.rows.len(), 2);
        assert_eq!(suspects.rows.len(), 1);
        assert_eq!(suspects.rows[0].participants[0].age, Some(18));
        assert_eq!(victims.rows[1].participants[0].gender, Gender::Female);
    }

    #[test]
    fn test_read_incidents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(
            &path,
            "incident_id,date,city_or_county,address,n_killed,n_injured,latitude,longitude,participant_type\n\
             1,2013-01-01,Mckeesport,1506 Versailles Avenue,0,4,40.3467,-79.8559,0::Victim||1::Victim\n\
             2,2013-01-02,Hawthorne,,1,3,,,\n",
        )
        .unwrap();

        let incidents = read_incidents(&path).unwrap();
        assert_eq!(incidents.len(), 2);
        assert_eq!(incidents[0].position(), Some((-79.8559, 40.3467)));
        assert_eq!(incidents[0].n_injured, Some(4));
        assert_eq!(incidents[1].address, None);
        assert_eq!(incidents[1].position(), None);
        assert!(incidents[1].participant_gender.is_empty());
    }
}
