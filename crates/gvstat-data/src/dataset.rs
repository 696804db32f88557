//! Per-role participant tables
//!
//! Victims and suspects are kept in two CSV files with the same shape: one row
//! per incident, a `date` column and a participant-list column
//! (`victim_info` or `suspect_info`) holding a list literal decoded by
//! [`literal`](crate::literal).
//!
//! ```text
//! date,victim_info
//! 2013-01-01,"[{'age': 20, 'gender': 'Male', 'status': 'Injured'}]"
//! ```

use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    literal::{format_participant_list, participants_from_literal},
    participant::{Participant, Role},
};

pub const DATE_COLUMN: &str = "date";
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum DatasetError {
    #[display("failed to open {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },
    #[display("failed to read CSV {}: {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },
    #[display("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[display("{}: missing column `{column}`", path.display())]
    MissingColumn { path: PathBuf, column: String },
}

/// Participants of one incident, all with the same role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantRow {
    pub date: NaiveDate,
    pub participants: Vec<Participant>,
}

/// All incidents of the dataset seen from one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleTable {
    pub role: Role,
    pub rows: Vec<ParticipantRow>,
}

impl RoleTable {
    #[must_use]
    pub fn new(role: Role) -> Self {
        Self { role, rows: vec![] }
    }

    /// Iterates over every participant of every row.
    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.rows.iter().flat_map(|row| &row.participants)
    }

    /// Reads a role table from a CSV file.
    ///
    /// Rows with an unparseable date are skipped; rows with an undecodable
    /// participant list are kept with no participants.
    pub fn read<P>(role: Role, path: P) -> Result<Self, DatasetError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let csv_error = |source| DatasetError::Csv {
            path: path.to_owned(),
            source,
        };

        let file = File::open(path).map_err(|source| DatasetError::Open {
            path: path.to_owned(),
            source,
        })?;
        let mut reader = csv::Reader::from_reader(io::BufReader::new(file));
        let headers = reader.headers().map_err(csv_error)?.clone();
        let column_index = |column: &str| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| DatasetError::MissingColumn {
                    path: path.to_owned(),
                    column: column.to_owned(),
                })
        };
        let date_idx = column_index(DATE_COLUMN)?;
        let list_idx = column_index(role.list_column())?;

        let mut table = Self::new(role);
        let mut skipped = 0;
        for (line, record) in reader.records().enumerate() {
            let record = match record {
                Ok(record) => record,
                Err(err) if err.is_io_error() => return Err(csv_error(err)),
                Err(err) => {
                    log::warn!("{}: skipping record {}: {err}", path.display(), line + 1);
                    skipped += 1;
                    continue;
                }
            };
            let Some(date) = record.get(date_idx).and_then(parse_date) else {
                log::debug!("{}: skipping record {} without a valid date", path.display(), line + 1);
                skipped += 1;
                continue;
            };
            let participants = record
                .get(list_idx)
                .map(participants_from_literal)
                .unwrap_or_default();
            table.rows.push(ParticipantRow { date, participants });
        }

        log::info!(
            "loaded {} {} rows from {} ({skipped} skipped)",
            table.rows.len(),
            role,
            path.display()
        );
        Ok(table)
    }

    /// Writes the table in the format read by [`RoleTable::read`].
    pub fn write<P>(&self, path: P) -> Result<(), DatasetError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let csv_error = |source| DatasetError::Csv {
            path: path.to_owned(),
            source,
        };

        let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
        writer
            .write_record([DATE_COLUMN, self.role.list_column()])
            .map_err(csv_error)?;
        for row in &self.rows {
            writer
                .write_record([
                    row.date.format(DATE_FORMAT).to_string(),
                    format_participant_list(&row.participants),
                ])
                .map_err(csv_error)?;
        }
        writer.flush().map_err(|source| DatasetError::Write {
            path: path.to_owned(),
            source,
        })?;
        Ok(())
    }
}

/// Parses a `YYYY-MM-DD` date, ignoring any trailing time part.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use gvstat_data::dataset::parse_date;
///
/// let expected = NaiveDate::from_ymd_opt(2014, 3, 9);
/// assert_eq!(parse_date("2014-03-09"), expected);
/// assert_eq!(parse_date("2014-03-09 00:00:00"), expected);
/// assert_eq!(parse_date("03/09/2014"), None);
/// ```
#[must_use]
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let date_part = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(date_part, DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::participant::Gender;

    #[test]
    fn test_read_tolerates_bad_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("victim_data.csv");
        fs::write(
            &path,
            "date,victim_info,extra\n\
             2015-02-01,\"[{'age': 20, 'gender': 'Male', 'status': 'Injured'}]\",x\n\
             not-a-date,\"[{'age': 21, 'gender': 'Male'}]\",x\n\
             2015-02-03,NA,x\n",
        )
        .unwrap();

        let table = RoleTable::read(Role::Victim, &path).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].participants.len(), 1);
        assert_eq!(table.rows[0].participants[0].age, Some(20));
        assert!(table.rows[1].participants.is_empty());
    }

    #[test]
    fn test_missing_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("suspect_data.csv");
        fs::write(&path, "date,victim_info\n2015-02-01,[]\n").unwrap();

        let err = RoleTable::read(Role::Suspect, &path).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::MissingColumn { ref column, .. } if column == "suspect_info"
        ));
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("suspect_data.csv");
        let table = RoleTable {
            role: Role::Suspect,
            rows: vec![ParticipantRow {
                date: NaiveDate::from_ymd_opt(2016, 7, 4).unwrap(),
                participants: vec![
                    Participant::new(Some(19), Gender::Male, Some("Unharmed, Arrested".into())),
                    Participant::new(None, Gender::Female, None),
                ],
            }],
        };
        table.write(&path).unwrap();
        assert_eq!(RoleTable::read(Role::Suspect, &path).unwrap(), table);
    }
}
